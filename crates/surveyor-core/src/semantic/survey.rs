//! Structural containers of the survey model.
//!
//! - [`Survey`] - The root, owning an ordered list of sections
//! - [`SurveySection`] - Owns its questions and question groups
//! - [`QuestionGroup`] - Groups questions by link, optionally as a grid or repeater
//! - [`GroupId`], [`QuestionId`], [`AnswerId`] - Positional links into the tree

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
    identifier::Id,
    semantic::{Answer, Dependency, Question},
    value::ValueMap,
};

/// Link to a [`QuestionGroup`]: its section and its position in that section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GroupId {
    pub section: usize,
    pub index: usize,
}

/// Link to a [`Question`]: its section and its position in that section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuestionId {
    pub section: usize,
    pub index: usize,
}

/// Link to an [`Answer`]: its owning question and its position among the
/// question's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AnswerId {
    pub question: QuestionId,
    pub index: usize,
}

/// How a question group is presented.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDisplay {
    #[default]
    Default,
    /// Every question of the group shares the group's answer templates
    Grid,
    /// The group may be answered several times
    Repeater,
}

impl FromStr for GroupDisplay {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "grid" => Ok(Self::Grid),
            "repeater" => Ok(Self::Repeater),
            _ => Err("Unsupported group display type"),
        }
    }
}

impl From<GroupDisplay> for &'static str {
    fn from(val: GroupDisplay) -> Self {
        match val {
            GroupDisplay::Default => "default",
            GroupDisplay::Grid => "grid",
            GroupDisplay::Repeater => "repeater",
        }
    }
}

impl fmt::Display for GroupDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// The root of a survey graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Survey {
    title: String,
    reference: Option<Id>,
    attributes: ValueMap,
    sections: Vec<SurveySection>,
}

impl Survey {
    /// Create an empty survey with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reference: None,
            attributes: ValueMap::new(),
            sections: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The symbolic reference id given with the verb (`survey_intake`).
    pub fn reference(&self) -> Option<Id> {
        self.reference
    }

    pub fn set_reference(&mut self, reference: Option<Id>) {
        self.reference = reference;
    }

    /// Extra keyword arguments the model does not type.
    pub fn attributes(&self) -> &ValueMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ValueMap {
        &mut self.attributes
    }

    pub fn sections(&self) -> &[SurveySection] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SurveySection> {
        self.sections.get(index)
    }

    pub fn section_mut(&mut self, index: usize) -> Option<&mut SurveySection> {
        self.sections.get_mut(index)
    }

    /// Append a section, assigning its display order, and return its index.
    pub fn add_section(&mut self, mut section: SurveySection) -> usize {
        let index = self.sections.len();
        section.display_order = index;
        self.sections.push(section);
        index
    }

    pub fn group(&self, id: GroupId) -> Option<&QuestionGroup> {
        self.sections.get(id.section)?.groups.get(id.index)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut QuestionGroup> {
        self.sections.get_mut(id.section)?.groups.get_mut(id.index)
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.sections.get(id.section)?.questions.get(id.index)
    }

    pub fn question_mut(&mut self, id: QuestionId) -> Option<&mut Question> {
        self.sections.get_mut(id.section)?.questions.get_mut(id.index)
    }

    pub fn answer(&self, id: AnswerId) -> Option<&Answer> {
        self.question(id.question)?.answers().get(id.index)
    }

    pub fn answer_mut(&mut self, id: AnswerId) -> Option<&mut Answer> {
        self.question_mut(id.question)?.answer_mut(id.index)
    }

    /// Iterate over every question of the survey in document order.
    pub fn questions(&self) -> impl Iterator<Item = (QuestionId, &Question)> {
        self.sections
            .iter()
            .enumerate()
            .flat_map(|(section, s)| {
                s.questions
                    .iter()
                    .enumerate()
                    .map(move |(index, q)| (QuestionId { section, index }, q))
            })
    }

    /// Find the first question declared with the given symbolic reference id.
    pub fn question_by_reference(&self, reference: &str) -> Option<(QuestionId, &Question)> {
        self.questions()
            .find(|(_, q)| q.reference().is_some_and(|r| r == reference))
    }

    /// Iterate over every dependency of the survey, whether owned by a
    /// question or by a question group.
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.sections.iter().flat_map(|s| {
            let group_deps = s.groups.iter().filter_map(QuestionGroup::dependency);
            let question_deps = s.questions.iter().filter_map(Question::dependency);
            group_deps.chain(question_deps)
        })
    }

    pub fn dependencies_mut(&mut self) -> impl Iterator<Item = &mut Dependency> {
        self.sections.iter_mut().flat_map(|s| {
            let group_deps = s.groups.iter_mut().filter_map(QuestionGroup::dependency_mut);
            let question_deps = s.questions.iter_mut().filter_map(Question::dependency_mut);
            group_deps.chain(question_deps)
        })
    }
}

/// A titled section of a survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveySection {
    title: String,
    reference: Option<Id>,
    display_order: usize,
    attributes: ValueMap,
    groups: Vec<QuestionGroup>,
    questions: Vec<Question>,
}

impl SurveySection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reference: None,
            display_order: 0,
            attributes: ValueMap::new(),
            groups: Vec::new(),
            questions: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn reference(&self) -> Option<Id> {
        self.reference
    }

    pub fn set_reference(&mut self, reference: Option<Id>) {
        self.reference = reference;
    }

    /// Position among the survey's sections, assigned by [`Survey::add_section`].
    pub fn display_order(&self) -> usize {
        self.display_order
    }

    pub fn attributes(&self) -> &ValueMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ValueMap {
        &mut self.attributes
    }

    pub fn groups(&self) -> &[QuestionGroup] {
        &self.groups
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Append a question group and return its index within this section.
    pub fn add_group(&mut self, group: QuestionGroup) -> usize {
        self.groups.push(group);
        self.groups.len() - 1
    }

    /// Append a question, assigning its display order, and return its index.
    pub fn add_question(&mut self, mut question: Question) -> usize {
        let index = self.questions.len();
        question.set_display_order(index);
        self.questions.push(question);
        index
    }
}

/// A set of questions presented together.
///
/// Questions point at their group through [`Question::group`]; the group does
/// not own them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionGroup {
    text: String,
    reference: Option<Id>,
    display: GroupDisplay,
    attributes: ValueMap,
    dependency: Option<Dependency>,
}

impl QuestionGroup {
    pub fn new(text: impl Into<String>, display: GroupDisplay) -> Self {
        Self {
            text: text.into(),
            reference: None,
            display,
            attributes: ValueMap::new(),
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

    pub fn display(&self) -> GroupDisplay {
        self.display
    }

    pub fn set_display(&mut self, display: GroupDisplay) {
        self.display = display;
    }

    pub fn is_grid(&self) -> bool {
        self.display == GroupDisplay::Grid
    }

    pub fn attributes(&self) -> &ValueMap {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ValueMap {
        &mut self.attributes
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

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn survey_with_questions(texts: &[&str]) -> Survey {
        let mut survey = Survey::new("S");
        let section = survey.add_section(SurveySection::new("Sec"));
        for text in texts {
            survey
                .section_mut(section)
                .expect("section exists")
                .add_question(Question::new(*text));
        }
        survey
    }

    #[test]
    fn test_add_section_assigns_display_order() {
        let mut survey = Survey::new("S");
        assert_eq!(survey.add_section(SurveySection::new("One")), 0);
        assert_eq!(survey.add_section(SurveySection::new("Two")), 1);

        let orders: Vec<_> = survey.sections().iter().map(|s| s.display_order()).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_lookups() {
        let mut survey = survey_with_questions(&["How old?", "Why?"]);
        let q = QuestionId {
            section: 0,
            index: 1,
        };
        assert_eq!(survey.question(q).map(Question::text), Some("Why?"));
        assert!(survey.question(QuestionId { section: 1, index: 0 }).is_none());

        let a = survey
            .question_mut(q)
            .expect("question exists")
            .add_answer(Answer::new("Because"));
        let id = AnswerId { question: q, index: a };
        assert_eq!(survey.answer(id).map(Answer::text), Some("Because"));
    }

    #[test]
    fn test_question_by_reference() {
        let mut survey = survey_with_questions(&["First"]);
        let mut q = Question::new("Second");
        q.set_reference(Some(Id::new("second")));
        survey.section_mut(0).expect("section exists").add_question(q);

        let (id, found) = survey.question_by_reference("second").expect("found");
        assert_eq!(id, QuestionId { section: 0, index: 1 });
        assert_eq!(found.text(), "Second");
        assert!(survey.question_by_reference("third").is_none());
    }

    #[test]
    fn test_group_display_from_str() {
        assert_eq!("grid".parse::<GroupDisplay>(), Ok(GroupDisplay::Grid));
        assert_eq!("repeater".parse::<GroupDisplay>(), Ok(GroupDisplay::Repeater));
        assert!("inline".parse::<GroupDisplay>().is_err());
        assert_eq!(GroupDisplay::default().to_string(), "default");
    }

    proptest! {
        #[test]
        fn display_order_counts_siblings(n in 0usize..40) {
            let texts: Vec<String> = (0..n).map(|i| format!("Q{i}")).collect();
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let survey = survey_with_questions(&refs);
            let orders: Vec<_> = survey.sections()[0]
                .questions()
                .iter()
                .map(Question::display_order)
                .collect();
            prop_assert_eq!(orders, (0..n).collect::<Vec<_>>());
        }
    }
}
