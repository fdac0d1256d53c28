use log::debug;

use surveyor_core::{
    semantic::{Answer, AnswerDisplay, AnswerId, ResponseClass},
    value::{Value, humanize},
};

use super::{BodyRule, Invocation, Keywords, NodeBuilder, invalid_argument};
use crate::{
    context::{AnswerSlot, Context, GridTemplate},
    error::Result,
    span::Spanned,
};

const ANSWER_SHAPES: &str = "a text or canned symbol, an optional response class symbol and an optional keyword map";

/// `a` and `answer`.
///
/// Accepted shapes, in order:
///
/// - `a text: "Yes", help_text: "..."`
/// - `a "Other", :string, help_text: "..."`
/// - `a :omit` (canned answer), optionally followed by a response class and keywords
/// - `a`
///
/// Inside a grid group the answer becomes a template instead of an answer of
/// the current question.
pub(super) struct AnswerBuilder;

impl AnswerBuilder {
    fn answer_from(invocation: &Invocation<'_>) -> Result<Answer> {
        let arguments = invocation.arguments;
        let (mut answer, rest) = match arguments.first().map(Spanned::inner) {
            None | Some(Value::Map(_)) => (Answer::new("Answer"), arguments),
            Some(Value::String(text)) => (Answer::new(text.as_str()), &arguments[1..]),
            Some(Value::Symbol(name)) => {
                let answer = canned(name).ok_or_else(|| {
                    invalid_argument(arguments[0].span(), format!("unknown canned answer `:{name}`"))
                        .with_help("canned answers are :other, :other_and_string, :none, :omit, :integer, :float, :date, :time, :datetime, :text and :string")
                })?;
                (answer, &arguments[1..])
            }
            Some(_) => return Err(invocation.invalid_arguments(ANSWER_SHAPES)),
        };

        let (class, map) = match rest {
            [] => (None, None),
            [map] if map.is_map() => (None, Some(map)),
            [class] if class.is_symbol() => (Some(class), None),
            [class, map] if class.is_symbol() && map.is_map() => (Some(class), Some(map)),
            _ => return Err(invocation.invalid_arguments(ANSWER_SHAPES)),
        };

        if let Some(class) = class {
            let name = class.as_name().unwrap_or_default();
            let response_class = name.parse::<ResponseClass>().map_err(|err| {
                invalid_argument(class.span(), format!("{err}: `:{name}`"))
            })?;
            answer.set_response_class(response_class);
        }

        let mut keywords = match map {
            Some(map) => Keywords::from_argument(map)?,
            None => Keywords::empty(invocation.span),
        };
        if let Some(text) = keywords.take_name("text")? {
            answer.set_text(text);
        }
        if let Some(response_class) = keywords.take_parsed("response_class")? {
            answer.set_response_class(response_class);
        }
        if let Some(is_exclusive) = keywords.take_bool("is_exclusive")? {
            answer.set_exclusive(is_exclusive);
        }
        if let Some(display) = keywords.take_parsed("display_type")? {
            answer.set_display(display);
        }
        answer.attributes_mut().extend(keywords.into_attributes());

        Ok(answer)
    }
}

/// The answer a canned symbol stands for.
fn canned(name: &str) -> Option<Answer> {
    let answer = match name {
        "other" => Answer::new("Other"),
        "other_and_string" => {
            let mut answer = Answer::new("Other");
            answer.set_response_class(ResponseClass::String);
            answer
        }
        "none" | "omit" => {
            let mut answer = Answer::new(humanize(name));
            answer.set_exclusive(true);
            answer
        }
        "integer" | "float" | "date" | "time" | "datetime" | "text" | "string" => {
            let mut answer = Answer::new(humanize(name));
            answer.set_response_class(name.parse().ok()?);
            answer.set_display(AnswerDisplay::HiddenLabel);
            answer
        }
        _ => return None,
    };
    Some(answer)
}

impl NodeBuilder for AnswerBuilder {
    fn body(&self) -> BodyRule {
        BodyRule::Forbidden
    }

    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()> {
        ctx.prune_answer();

        let mut answer = Self::answer_from(invocation)?;
        let reference = invocation.reference_id();
        answer.set_reference(reference);

        if ctx.in_grid() {
            debug!(text = answer.text(); "Built grid answer template");
            ctx.grid_answers.push(GridTemplate {
                answer,
                span: invocation.span,
            });
            ctx.answer = Some(AnswerSlot::Template(ctx.grid_answers.len() - 1));
            return Ok(());
        }

        let Some(question_id) = ctx.question else {
            return Err(invocation.missing_parent("a question"));
        };
        let Some(question) = ctx.survey.as_mut().and_then(|s| s.question_mut(question_id)) else {
            return Err(invocation.missing_parent("a question"));
        };

        let index = question.add_answer(answer);
        let id = AnswerId {
            question: question_id,
            index,
        };
        debug!(index; "Built answer");

        if let (Some(question_reference), Some(reference)) = (question.reference(), reference) {
            ctx.references
                .register_answer(question_reference, reference, id, invocation.span);
        }

        ctx.answer = Some(AnswerSlot::Question(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_answers() {
        let other = canned("other").unwrap();
        assert_eq!(other.text(), "Other");
        assert_eq!(other.response_class(), ResponseClass::Answer);

        let other_and_string = canned("other_and_string").unwrap();
        assert_eq!(other_and_string.response_class(), ResponseClass::String);

        let omit = canned("omit").unwrap();
        assert_eq!(omit.text(), "Omit");
        assert!(omit.is_exclusive());

        let date = canned("date").unwrap();
        assert_eq!(date.text(), "Date");
        assert_eq!(date.response_class(), ResponseClass::Date);
        assert_eq!(date.display(), AnswerDisplay::HiddenLabel);

        assert!(canned("maybe").is_none());
    }
}
