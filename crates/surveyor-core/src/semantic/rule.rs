//! Conditional-display dependencies and answer validations.
//!
//! Both are small rule trees: a rule expression over single-letter (or
//! author-chosen) rule keys, and an ordered list of conditions each tagged with
//! one of those keys.

use serde::Serialize;

use crate::{
    identifier::Id,
    semantic::{AnswerId, QuestionId},
    value::ValueMap,
};

/// The comparison used when no operator is given.
pub const DEFAULT_OPERATOR: &str = "==";

/// The validation rule used when no rule is given.
pub const DEFAULT_VALIDATION_RULE: &str = "A";

/// Decides whether a question or question group is shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dependency {
    rule: Option<String>,
    attributes: ValueMap,
    conditions: Vec<DependencyCondition>,
}

impl Dependency {
    pub fn new(rule: Option<String>) -> Self {
        Self {
            rule,
            attributes: ValueMap::new(),
            conditions: Vec::new(),
        }
    }

    /// The rule expression, e.g. `"A or (B and C)"`.
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    pub fn set_rule(&mut self, rule: impl Into<String>) {
        self.rule = Some(rule.into());
    }

    /// The conjunction of the conditions' rule keys, in declaration order.
    ///
    /// Returns `None` when no condition carries a rule key.
    pub fn default_rule(&self) -> Option<String> {
        let keys: Vec<&str> = self
            .conditions
            .iter()
            .filter_map(DependencyCondition::rule_key)
            .collect();
        (!keys.is_empty()).then(|| keys.join(" and "))
    }

    pub fn attributes(&self) -> &ValueMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ValueMap {
        &mut self.attributes
    }

    pub fn conditions(&self) -> &[DependencyCondition] {
        &self.conditions
    }

    pub fn condition_mut(&mut self, index: usize) -> Option<&mut DependencyCondition> {
        self.conditions.get_mut(index)
    }

    /// Append a condition and return its index.
    pub fn add_condition(&mut self, condition: DependencyCondition) -> usize {
        self.conditions.push(condition);
        self.conditions.len() - 1
    }
}

/// One comparison of a [`Dependency`] against an earlier question's answer.
///
/// The author names the question and answer symbolically; the resolved links
/// are filled in when the owning question or group commits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyCondition {
    rule_key: Option<String>,
    operator: String,
    question_reference: Id,
    answer_reference: Option<Id>,
    question: Option<QuestionId>,
    answer: Option<AnswerId>,
    attributes: ValueMap,
}

impl DependencyCondition {
    pub fn new(question_reference: Id, operator: impl Into<String>) -> Self {
        Self {
            rule_key: None,
            operator: operator.into(),
            question_reference,
            answer_reference: None,
            question: None,
            answer: None,
            attributes: ValueMap::new(),
        }
    }

    pub fn rule_key(&self) -> Option<&str> {
        self.rule_key.as_deref()
    }

    pub fn set_rule_key(&mut self, rule_key: Option<String>) {
        self.rule_key = rule_key;
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn set_operator(&mut self, operator: impl Into<String>) {
        self.operator = operator.into();
    }

    /// The symbolic question id, without its `q_` prefix.
    pub fn question_reference(&self) -> Id {
        self.question_reference
    }

    pub fn set_question_reference(&mut self, reference: Id) {
        self.question_reference = reference;
    }

    /// The symbolic answer id, without its `a_` prefix.
    pub fn answer_reference(&self) -> Option<Id> {
        self.answer_reference
    }

    pub fn set_answer_reference(&mut self, reference: Option<Id>) {
        self.answer_reference = reference;
    }

    pub fn question(&self) -> Option<QuestionId> {
        self.question
    }

    pub fn set_question(&mut self, question: Option<QuestionId>) {
        self.question = question;
    }

    pub fn answer(&self) -> Option<AnswerId> {
        self.answer
    }

    pub fn set_answer(&mut self, answer: Option<AnswerId>) {
        self.answer = answer;
    }

    /// Response values to compare against (`integer_value`, `string_value`, ...).
    pub fn attributes(&self) -> &ValueMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ValueMap {
        &mut self.attributes
    }
}

/// Constrains the response entered for an [`Answer`](crate::semantic::Answer).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    rule: String,
    attributes: ValueMap,
    conditions: Vec<ValidationCondition>,
}

impl Default for Validation {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATION_RULE)
    }
}

impl Validation {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            attributes: ValueMap::new(),
            conditions: Vec::new(),
        }
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn set_rule(&mut self, rule: impl Into<String>) {
        self.rule = rule.into();
    }

    pub fn attributes(&self) -> &ValueMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ValueMap {
        &mut self.attributes
    }

    pub fn conditions(&self) -> &[ValidationCondition] {
        &self.conditions
    }

    /// Append a condition and return its index.
    pub fn add_condition(&mut self, condition: ValidationCondition) -> usize {
        self.conditions.push(condition);
        self.conditions.len() - 1
    }
}

/// One check of a [`Validation`], e.g. `integer_value >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationCondition {
    rule_key: Option<String>,
    operator: String,
    attributes: ValueMap,
}

impl ValidationCondition {
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            rule_key: None,
            operator: operator.into(),
            attributes: ValueMap::new(),
        }
    }

    pub fn rule_key(&self) -> Option<&str> {
        self.rule_key.as_deref()
    }

    pub fn set_rule_key(&mut self, rule_key: Option<String>) {
        self.rule_key = rule_key;
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn set_operator(&mut self, operator: impl Into<String>) {
        self.operator = operator.into();
    }

    pub fn attributes(&self) -> &ValueMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ValueMap {
        &mut self.attributes
    }
}
