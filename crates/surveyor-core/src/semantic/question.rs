//! Questions and answers.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
    identifier::Id,
    semantic::{AnswerId, Dependency, GroupId, Validation},
    value::ValueMap,
};

/// How a question is presented.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionDisplay {
    #[default]
    Default,
    /// Text only, no answers expected
    Label,
    Image,
    HiddenLabel,
}

impl FromStr for QuestionDisplay {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "label" => Ok(Self::Label),
            "image" => Ok(Self::Image),
            "hidden_label" => Ok(Self::HiddenLabel),
            _ => Err("Unsupported question display type"),
        }
    }
}

impl From<QuestionDisplay> for &'static str {
    fn from(val: QuestionDisplay) -> Self {
        match val {
            QuestionDisplay::Default => "default",
            QuestionDisplay::Label => "label",
            QuestionDisplay::Image => "image",
            QuestionDisplay::HiddenLabel => "hidden_label",
        }
    }
}

impl fmt::Display for QuestionDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// How an answer is presented.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerDisplay {
    #[default]
    Default,
    HiddenLabel,
}

impl FromStr for AnswerDisplay {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "hidden_label" => Ok(Self::HiddenLabel),
            _ => Err("Unsupported answer display type"),
        }
    }
}

impl From<AnswerDisplay> for &'static str {
    fn from(val: AnswerDisplay) -> Self {
        match val {
            AnswerDisplay::Default => "default",
            AnswerDisplay::HiddenLabel => "hidden_label",
        }
    }
}

impl fmt::Display for AnswerDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// The kind of data a respondent enters when picking an answer.
///
/// `Answer` means the answer carries no response data beyond being chosen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseClass {
    #[default]
    Answer,
    String,
    Text,
    Integer,
    Float,
    Date,
    Time,
    Datetime,
}

impl FromStr for ResponseClass {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answer" => Ok(Self::Answer),
            "string" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "datetime" => Ok(Self::Datetime),
            _ => Err("Unsupported response class"),
        }
    }
}

impl From<ResponseClass> for &'static str {
    fn from(val: ResponseClass) -> Self {
        match val {
            ResponseClass::Answer => "answer",
            ResponseClass::String => "string",
            ResponseClass::Text => "text",
            ResponseClass::Integer => "integer",
            ResponseClass::Float => "float",
            ResponseClass::Date => "date",
            ResponseClass::Time => "time",
            ResponseClass::Datetime => "datetime",
        }
    }
}

impl fmt::Display for ResponseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A question belonging to a [`SurveySection`](crate::semantic::SurveySection).
///
/// A question may carry a pending correct-answer key (`correct`), naming one
/// of its own answers by symbolic id. The key is resolved into
/// [`Question::correct_answer`] once the question's answers are known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    text: String,
    reference: Option<Id>,
    display: QuestionDisplay,
    display_order: usize,
    group: Option<GroupId>,
    correct: Option<Id>,
    correct_answer: Option<AnswerId>,
    attributes: ValueMap,
    answers: Vec<Answer>,
    dependency: Option<Dependency>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reference: None,
            display: QuestionDisplay::Default,
            display_order: 0,
            group: None,
            correct: None,
            correct_answer: None,
            attributes: ValueMap::new(),
            answers: Vec::new(),
            dependency: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn reference(&self) -> Option<Id> {
        self.reference
    }

    pub fn set_reference(&mut self, reference: Option<Id>) {
        self.reference = reference;
    }

    pub fn display(&self) -> QuestionDisplay {
        self.display
    }

    pub fn set_display(&mut self, display: QuestionDisplay) {
        self.display = display;
    }

    /// Position among the section's questions.
    pub fn display_order(&self) -> usize {
        self.display_order
    }

    pub(crate) fn set_display_order(&mut self, display_order: usize) {
        self.display_order = display_order;
    }

    /// The group this question is presented in, if any.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }

    /// Pending correct-answer key, as written by the author.
    pub fn correct(&self) -> Option<Id> {
        self.correct
    }

    pub fn set_correct(&mut self, correct: Option<Id>) {
        self.correct = correct;
    }

    /// Resolved link to the correct answer.
    pub fn correct_answer(&self) -> Option<AnswerId> {
        self.correct_answer
    }

    pub fn set_correct_answer(&mut self, correct_answer: Option<AnswerId>) {
        self.correct_answer = correct_answer;
    }

    pub fn attributes(&self) -> &ValueMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ValueMap {
        &mut self.attributes
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn answer_mut(&mut self, index: usize) -> Option<&mut Answer> {
        self.answers.get_mut(index)
    }

    /// Append an answer, assigning its display order, and return its index.
    pub fn add_answer(&mut self, mut answer: Answer) -> usize {
        let index = self.answers.len();
        answer.display_order = index;
        self.answers.push(answer);
        index
    }

    pub fn dependency(&self) -> Option<&Dependency> {
        self.dependency.as_ref()
    }

    pub fn dependency_mut(&mut self) -> Option<&mut Dependency> {
        self.dependency.as_mut()
    }

    /// Attach a dependency, replacing any previous one.
    pub fn set_dependency(&mut self, dependency: Dependency) {
        self.dependency = Some(dependency);
    }
}

/// An answer option of a [`Question`], or a grid template before it is cloned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    text: String,
    reference: Option<Id>,
    response_class: ResponseClass,
    is_exclusive: bool,
    display: AnswerDisplay,
    display_order: usize,
    attributes: ValueMap,
    validations: Vec<Validation>,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reference: None,
            response_class: ResponseClass::Answer,
            is_exclusive: false,
            display: AnswerDisplay::Default,
            display_order: 0,
            attributes: ValueMap::new(),
            validations: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn reference(&self) -> Option<Id> {
        self.reference
    }

    pub fn set_reference(&mut self, reference: Option<Id>) {
        self.reference = reference;
    }

    pub fn response_class(&self) -> ResponseClass {
        self.response_class
    }

    pub fn set_response_class(&mut self, response_class: ResponseClass) {
        self.response_class = response_class;
    }

    /// Whether picking this answer clears and disables the other answers.
    pub fn is_exclusive(&self) -> bool {
        self.is_exclusive
    }

    pub fn set_exclusive(&mut self, is_exclusive: bool) {
        self.is_exclusive = is_exclusive;
    }

    pub fn display(&self) -> AnswerDisplay {
        self.display
    }

    pub fn set_display(&mut self, display: AnswerDisplay) {
        self.display = display;
    }

    /// Position among the owning question's answers.
    pub fn display_order(&self) -> usize {
        self.display_order
    }

    pub fn attributes(&self) -> &ValueMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ValueMap {
        &mut self.attributes
    }

    pub fn validations(&self) -> &[Validation] {
        &self.validations
    }

    pub fn validation_mut(&mut self, index: usize) -> Option<&mut Validation> {
        self.validations.get_mut(index)
    }

    /// Append a validation and return its index.
    pub fn add_validation(&mut self, validation: Validation) -> usize {
        self.validations.push(validation);
        self.validations.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_answer_assigns_display_order() {
        let mut question = Question::new("How old?");
        assert_eq!(question.add_answer(Answer::new("Under 18")), 0);
        assert_eq!(question.add_answer(Answer::new("18+")), 1);

        let orders: Vec<_> = question.answers().iter().map(Answer::display_order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_cloned_template_gets_fresh_display_order() {
        let mut template = Answer::new("Yes");
        template.set_reference(Some(Id::new("yes")));

        let mut first = Question::new("One");
        first.add_answer(Answer::new("Maybe"));
        first.add_answer(template.clone());

        assert_eq!(first.answers()[1].display_order(), 1);
        assert_eq!(template.display_order(), 0);
        assert_eq!(first.answers()[1].reference(), Some(Id::new("yes")));
    }

    #[test]
    fn test_response_class_round_trip_names() {
        for name in ["answer", "string", "text", "integer", "float", "date", "time", "datetime"] {
            let class: ResponseClass = name.parse().expect("known response class");
            assert_eq!(class.to_string(), name);
        }
        assert!("blob".parse::<ResponseClass>().is_err());
    }

    #[test]
    fn test_display_enums_from_str() {
        assert_eq!("label".parse::<QuestionDisplay>(), Ok(QuestionDisplay::Label));
        assert_eq!(
            "hidden_label".parse::<AnswerDisplay>(),
            Ok(AnswerDisplay::HiddenLabel)
        );
        assert!("image".parse::<AnswerDisplay>().is_err());
    }
}
