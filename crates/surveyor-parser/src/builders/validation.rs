use log::debug;

use surveyor_core::{
    semantic::{DEFAULT_OPERATOR, DEFAULT_VALIDATION_RULE, Validation, ValidationCondition},
    value::Value,
};

use super::{BodyRule, Invocation, Keywords, NodeBuilder, invalid_argument, keywords_only};
use crate::{
    context::{Context, ValidationSlot},
    error::Result,
    span::Spanned,
};

/// `v` and `validation`, attached to the current answer or grid template.
pub(super) struct ValidationBuilder;

impl NodeBuilder for ValidationBuilder {
    fn body(&self) -> BodyRule {
        BodyRule::Forbidden
    }

    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()> {
        let Some(answer_slot) = ctx.answer else {
            return Err(invocation.missing_parent("an answer"));
        };

        ctx.prune_validation();

        let mut keywords = keywords_only(invocation)?;
        let rule = keywords
            .take_name("rule")?
            .unwrap_or_else(|| DEFAULT_VALIDATION_RULE.to_string());
        let mut validation = Validation::new(rule);
        validation
            .attributes_mut()
            .extend(keywords.into_attributes());

        let Some(answer) = ctx.answer_mut(answer_slot) else {
            return Err(invocation.missing_parent("an answer"));
        };
        let index = answer.add_validation(validation);
        debug!(index; "Built validation");

        ctx.validation = Some(ValidationSlot {
            answer: answer_slot,
            index,
        });
        Ok(())
    }
}

/// `vc`, `vcondition`, and `c` inside a validation.
///
/// `vc_A "<=", integer_value: 120`
pub(super) struct ValidationConditionBuilder;

impl ValidationConditionBuilder {
    fn condition_from(invocation: &Invocation<'_>) -> Result<ValidationCondition> {
        let (operator, map) = match invocation.arguments {
            [] => (None, None),
            [map] if map.is_map() => (None, Some(map)),
            [operator] => (Some(operator), None),
            [operator, map] if map.is_map() => (Some(operator), Some(map)),
            _ => {
                return Err(invocation.invalid_arguments(
                    "an optional operator and an optional keyword map",
                ));
            }
        };

        let operator = match operator.map(Spanned::inner) {
            None | Some(Value::Nil) => DEFAULT_OPERATOR.to_string(),
            Some(value) => value
                .as_name()
                .map_err(|err| invalid_argument(invocation.span, format!("invalid operator: {err}")))?
                .to_string(),
        };

        let mut condition = ValidationCondition::new(operator);
        condition.set_rule_key(invocation.reference.map(str::to_string));

        if let Some(map) = map {
            let mut keywords = Keywords::from_argument(map)?;
            if let Some(operator) = keywords.take_name("operator")? {
                condition.set_operator(operator);
            }
            condition
                .attributes_mut()
                .extend(keywords.into_attributes());
        }

        Ok(condition)
    }
}

impl NodeBuilder for ValidationConditionBuilder {
    fn body(&self) -> BodyRule {
        BodyRule::Forbidden
    }

    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()> {
        let Some(slot) = ctx.validation else {
            return Err(invocation.missing_parent("a validation"));
        };

        let condition = Self::condition_from(invocation)?;
        let Some(validation) = ctx.validation_mut(slot) else {
            return Err(invocation.missing_parent("a validation"));
        };
        let index = validation.add_condition(condition);
        debug!(index; "Built validation condition");
        Ok(())
    }
}
