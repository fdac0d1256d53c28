use log::debug;

use surveyor_core::semantic::{AnswerId, Question, QuestionDisplay, QuestionId};

use super::{BodyRule, Invocation, NodeBuilder, reference_name, text_and_keywords};
use crate::{
    context::{Context, Pending},
    error::Result,
};

/// `q`, `question`, `label` and `image`.
///
/// Inside a grid group the question receives a copy of every grid template.
/// A `correct` keyword queues a correct-answer marker, resolved when the
/// question commits and its answers are known.
pub(super) struct QuestionBuilder;

impl QuestionBuilder {
    fn display_for(base: &str) -> QuestionDisplay {
        match base {
            "label" => QuestionDisplay::Label,
            "image" => QuestionDisplay::Image,
            _ => QuestionDisplay::Default,
        }
    }
}

impl NodeBuilder for QuestionBuilder {
    fn body(&self) -> BodyRule {
        BodyRule::Optional
    }

    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()> {
        let Some(section) = ctx.section else {
            return Err(invocation.missing_parent("a survey section"));
        };

        ctx.commit();
        ctx.prune_question();

        let (text, mut keywords) = text_and_keywords(invocation, "text", "Question")?;
        let display = keywords
            .take_parsed("display_type")?
            .unwrap_or_else(|| Self::display_for(invocation.base));
        let correct = match keywords.take("correct") {
            Some(value) => reference_name(&value, "a_", invocation.span)?,
            None => None,
        };

        let reference = invocation.reference_id();
        let mut question = Question::new(text);
        question.set_reference(reference);
        question.set_display(display);
        question.set_group(ctx.group);
        question.set_correct(correct);
        question.attributes_mut().extend(keywords.into_attributes());

        let templates = if ctx.in_grid() {
            ctx.grid_answers.clone()
        } else {
            Vec::new()
        };

        let Some(section_node) = ctx.survey.as_mut().and_then(|s| s.section_mut(section)) else {
            return Err(invocation.missing_parent("a survey section"));
        };
        for template in &templates {
            question.add_answer(template.answer.clone());
        }
        let index = section_node.add_question(question);
        let id = QuestionId { section, index };
        debug!(section, index, clones = templates.len(); "Built question");

        if let Some(reference) = reference {
            ctx.references
                .register_question(reference, id, invocation.span);

            for (answer_index, template) in templates.iter().enumerate() {
                if let Some(answer_reference) = template.answer.reference() {
                    let answer = AnswerId {
                        question: id,
                        index: answer_index,
                    };
                    ctx.references
                        .register_answer(reference, answer_reference, answer, template.span);
                }
            }
        }

        if correct.is_some() {
            ctx.pending.push(Pending::CorrectAnswer {
                question: id,
                span: invocation.span,
            });
        }

        ctx.question = Some(id);
        Ok(())
    }

    fn prune(&self, ctx: &mut Context) {
        ctx.commit();
        ctx.prune_question();
    }
}
