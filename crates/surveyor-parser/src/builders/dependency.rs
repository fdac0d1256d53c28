use log::debug;

use surveyor_core::{
    semantic::{DEFAULT_OPERATOR, Dependency, DependencyCondition},
    value::Value,
};

use super::{BodyRule, Invocation, Keywords, NodeBuilder, invalid_argument, keywords_only, reference_name};
use crate::{
    context::{Context, DependencyOwner, Pending},
    error::Result,
    span::Spanned,
};

/// `d` and `dependency`, attached to the open question or else the open group.
pub(super) struct DependencyBuilder;

impl NodeBuilder for DependencyBuilder {
    fn body(&self) -> BodyRule {
        BodyRule::Optional
    }

    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()> {
        ctx.prune_dependency();

        let owner = match (ctx.question, ctx.group) {
            (Some(question), _) => DependencyOwner::Question(question),
            (None, Some(group)) => DependencyOwner::Group(group),
            (None, None) => return Err(invocation.missing_parent("a question or question group")),
        };

        let mut keywords = keywords_only(invocation)?;
        let mut dependency = Dependency::new(keywords.take_name("rule")?);
        dependency
            .attributes_mut()
            .extend(keywords.into_attributes());

        // A second dependency replaces the first, along with its queued conditions.
        ctx.forget_pending(owner);

        let Some(survey) = ctx.survey.as_mut() else {
            return Err(invocation.missing_parent("a survey"));
        };
        match owner {
            DependencyOwner::Question(id) => {
                if let Some(question) = survey.question_mut(id) {
                    question.set_dependency(dependency);
                }
            }
            DependencyOwner::Group(id) => {
                if let Some(group) = survey.group_mut(id) {
                    group.set_dependency(dependency);
                }
            }
        }
        debug!(owner:?; "Built dependency");

        ctx.dependency = Some(owner);
        Ok(())
    }

    fn prune(&self, ctx: &mut Context) {
        ctx.prune_dependency();
    }
}

/// `dc`, `dcondition`, and `c` outside a validation.
///
/// `dc_A :q_age, "==", :a_over` conditions on answer `over` of question `age`
/// with rule key `A`. The third argument may instead be a keyword map.
pub(super) struct DependencyConditionBuilder;

impl DependencyConditionBuilder {
    fn condition_from(invocation: &Invocation<'_>) -> Result<DependencyCondition> {
        let (question, operator, answer) = match invocation.arguments {
            [question] => (question, None, None),
            [question, answer] if answer.is_map() => (question, None, Some(answer)),
            [question, operator] => (question, Some(operator), None),
            [question, operator, answer] => (question, Some(operator), Some(answer)),
            _ => {
                return Err(invocation.invalid_arguments(
                    "a question reference, an optional operator and an optional answer reference",
                ));
            }
        };

        let question_reference = reference_name(question, "q_", question.span())?
            .ok_or_else(|| invalid_argument(question.span(), "empty question reference"))?;

        let operator = match operator.map(Spanned::inner) {
            None | Some(Value::Nil) => DEFAULT_OPERATOR.to_string(),
            Some(value) => value
                .as_name()
                .map_err(|err| invalid_argument(invocation.span, format!("invalid operator: {err}")))?
                .to_string(),
        };

        let mut condition = DependencyCondition::new(question_reference, operator);
        condition.set_rule_key(invocation.reference.map(str::to_string));

        match answer {
            Some(map) if map.is_map() => {
                let mut keywords = Keywords::from_argument(map)?;
                if let Some(operator) = keywords.take_name("operator")? {
                    condition.set_operator(operator);
                }
                if let Some(value) = keywords.take("answer_reference") {
                    condition.set_answer_reference(reference_name(&value, "a_", map.span())?);
                }
                condition
                    .attributes_mut()
                    .extend(keywords.into_attributes());
            }
            Some(answer) => {
                condition.set_answer_reference(reference_name(answer, "a_", answer.span())?);
            }
            None => {}
        }

        Ok(condition)
    }
}

impl NodeBuilder for DependencyConditionBuilder {
    fn body(&self) -> BodyRule {
        BodyRule::Forbidden
    }

    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()> {
        let Some(owner) = ctx.dependency else {
            return Err(invocation.missing_parent("a dependency"));
        };

        let condition = Self::condition_from(invocation)?;
        let Some(dependency) = ctx.dependency_mut(owner) else {
            return Err(invocation.missing_parent("a dependency"));
        };
        let index = dependency.add_condition(condition);
        debug!(index, owner:?; "Built dependency condition");

        ctx.pending.push(Pending::Condition {
            owner,
            index,
            span: invocation.span,
        });
        Ok(())
    }
}
