//! Interpretation context.
//!
//! The [`Context`] is the current position in the survey under construction:
//! one slot per open node kind plus the reference tables. Builders narrow it
//! when they open a node and prune it back when the node's body closes.
//!
//! | Builder    | Entry prune                          | Close prune          |
//! |------------|--------------------------------------|----------------------|
//! | Survey     | everything, fresh tables             | (finalizer)          |
//! | Section    | keep survey and tables               | same                 |
//! | Group      | keep survey, section and tables      | same                 |
//! | Question   | question, answer, dependency, validation | same             |
//! | Answer     | answer, validation                   |                      |
//! | Dependency | dependency                           | dependency           |
//! | Validation | validation                           |                      |
//!
//! Reference tables and accumulators survive every prune except the one at
//! survey entry.

use indexmap::IndexMap;
use log::trace;

use surveyor_core::{
    identifier::Id,
    semantic::{
        Answer, AnswerId, Dependency, GroupId, QuestionGroup, QuestionId, Survey, Validation,
    },
};

use crate::span::Span;

/// Where the current answer lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnswerSlot {
    /// An answer of a question in the survey
    Question(AnswerId),
    /// A grid template, by index into [`Context::grid_answers`]
    Template(usize),
}

/// The node that owns the current dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DependencyOwner {
    Question(QuestionId),
    Group(GroupId),
}

/// The current validation: its answer and its index among the answer's validations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ValidationSlot {
    pub answer: AnswerSlot,
    pub index: usize,
}

/// An answer declared in a grid group, cloned into each of its questions.
#[derive(Debug, Clone)]
pub(crate) struct GridTemplate {
    pub answer: Answer,
    pub span: Span,
}

/// A bad, duplicate or unresolved reference, reported by the finalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReferenceIssue {
    /// Author-facing spelling: `q_age` or `q_age, a_over`
    pub reference: String,
    pub span: Span,
    /// For duplicates, the previous declaration
    pub previous: Option<Span>,
}

impl ReferenceIssue {
    fn new(reference: String, span: Span) -> Self {
        Self {
            reference,
            span,
            previous: None,
        }
    }
}

/// Symbolic id tables and the issue accumulators of one survey.
#[derive(Debug, Default)]
pub(crate) struct ReferenceTables {
    questions: IndexMap<Id, (QuestionId, Span)>,
    answers: IndexMap<Id, IndexMap<Id, (AnswerId, Span)>>,
    bad: Vec<ReferenceIssue>,
    duplicates: Vec<ReferenceIssue>,
    missed_correct_answers: Vec<ReferenceIssue>,
}

impl ReferenceTables {
    /// Bind a question reference. Re-binding records a duplicate and the
    /// latest declaration takes the slot.
    pub fn register_question(&mut self, reference: Id, question: QuestionId, span: Span) {
        if let Some((_, previous)) = self.questions.insert(reference, (question, span)) {
            self.duplicates.push(ReferenceIssue {
                reference: reference.question_reference(),
                span,
                previous: Some(previous),
            });
        }
    }

    /// Bind an answer reference within its question's table.
    pub fn register_answer(&mut self, question: Id, answer: Id, id: AnswerId, span: Span) {
        let table = self.answers.entry(question).or_default();
        if let Some((_, previous)) = table.insert(answer, (id, span)) {
            self.duplicates.push(ReferenceIssue {
                reference: answer_spelling(question, answer),
                span,
                previous: Some(previous),
            });
        }
    }

    pub fn question(&self, reference: Id) -> Option<QuestionId> {
        self.questions.get(&reference).map(|(id, _)| *id)
    }

    pub fn answer(&self, question: Id, answer: Id) -> Option<AnswerId> {
        self.answers
            .get(&question)?
            .get(&answer)
            .map(|(id, _)| *id)
    }

    pub fn record_bad(&mut self, reference: String, span: Span) {
        self.bad.push(ReferenceIssue::new(reference, span));
    }

    pub fn record_missed_correct_answer(&mut self, reference: String, span: Span) {
        self.missed_correct_answers
            .push(ReferenceIssue::new(reference, span));
    }

    pub fn bad_references(&self) -> &[ReferenceIssue] {
        &self.bad
    }

    pub fn duplicate_references(&self) -> &[ReferenceIssue] {
        &self.duplicates
    }

    pub fn missed_correct_answers(&self) -> &[ReferenceIssue] {
        &self.missed_correct_answers
    }
}

/// `q_<question>, a_<answer>`
pub(crate) fn answer_spelling(question: Id, answer: Id) -> String {
    format!(
        "{}, {}",
        question.question_reference(),
        answer.answer_reference()
    )
}

/// A reference resolution waiting for its owner to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pending {
    Condition {
        owner: DependencyOwner,
        index: usize,
        span: Span,
    },
    CorrectAnswer {
        question: QuestionId,
        span: Span,
    },
}

impl Pending {
    fn is_owned_by(&self, owner: DependencyOwner) -> bool {
        matches!(self, Pending::Condition { owner: o, .. } if *o == owner)
    }
}

/// Append-only progress messages of one parse.
///
/// Every message also goes to the `log` facade at trace level; it is only
/// kept when tracing is enabled.
#[derive(Debug, Default)]
pub(crate) struct Trace {
    enabled: bool,
    entries: Vec<String>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        trace!(entry = message.as_str(); "Trace");
        if self.enabled {
            self.entries.push(message);
        }
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

/// Mutable state threaded through interpretation.
#[derive(Debug, Default)]
pub(crate) struct Context {
    pub survey: Option<Survey>,
    pub section: Option<usize>,
    pub group: Option<GroupId>,
    pub question: Option<QuestionId>,
    pub answer: Option<AnswerSlot>,
    pub dependency: Option<DependencyOwner>,
    pub validation: Option<ValidationSlot>,
    pub grid_answers: Vec<GridTemplate>,
    pub references: ReferenceTables,
    pub pending: Vec<Pending>,
    pub trace: Trace,
    pub strict_correct_answers: bool,
}

impl Context {
    pub fn new(trace: Trace, strict_correct_answers: bool) -> Self {
        Self {
            trace,
            strict_correct_answers,
            ..Self::default()
        }
    }

    /// Survey entry prune: drop every slot and start fresh reference tables.
    pub fn reset(&mut self) {
        let trace = std::mem::take(&mut self.trace);
        *self = Self::new(trace, self.strict_correct_answers);
    }

    /// Keep the survey and the tables.
    pub fn prune_to_survey(&mut self) {
        self.section = None;
        self.prune_to_section();
    }

    /// Keep the survey, the section and the tables.
    pub fn prune_to_section(&mut self) {
        self.group = None;
        self.grid_answers.clear();
        self.prune_question();
    }

    pub fn prune_question(&mut self) {
        self.question = None;
        self.dependency = None;
        self.prune_answer();
    }

    pub fn prune_answer(&mut self) {
        self.answer = None;
        self.validation = None;
    }

    pub fn prune_dependency(&mut self) {
        self.dependency = None;
    }

    pub fn prune_validation(&mut self) {
        self.validation = None;
    }

    pub fn has_validation(&self) -> bool {
        self.validation.is_some()
    }

    pub fn current_group(&self) -> Option<&QuestionGroup> {
        self.survey.as_ref()?.group(self.group?)
    }

    /// Whether answers declared now become grid templates.
    pub fn in_grid(&self) -> bool {
        self.current_group().is_some_and(QuestionGroup::is_grid)
    }

    pub fn answer_mut(&mut self, slot: AnswerSlot) -> Option<&mut Answer> {
        match slot {
            AnswerSlot::Question(id) => self.survey.as_mut()?.answer_mut(id),
            AnswerSlot::Template(index) => self
                .grid_answers
                .get_mut(index)
                .map(|template| &mut template.answer),
        }
    }

    pub fn dependency(&self, owner: DependencyOwner) -> Option<&Dependency> {
        let survey = self.survey.as_ref()?;
        match owner {
            DependencyOwner::Question(id) => survey.question(id)?.dependency(),
            DependencyOwner::Group(id) => survey.group(id)?.dependency(),
        }
    }

    pub fn dependency_mut(&mut self, owner: DependencyOwner) -> Option<&mut Dependency> {
        let survey = self.survey.as_mut()?;
        match owner {
            DependencyOwner::Question(id) => survey.question_mut(id)?.dependency_mut(),
            DependencyOwner::Group(id) => survey.group_mut(id)?.dependency_mut(),
        }
    }

    pub fn validation_mut(&mut self, slot: ValidationSlot) -> Option<&mut Validation> {
        self.answer_mut(slot.answer)?.validation_mut(slot.index)
    }

    /// Drop resolutions queued for a dependency that is being replaced.
    pub fn forget_pending(&mut self, owner: DependencyOwner) {
        self.pending.retain(|pending| !pending.is_owned_by(owner));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_id(index: usize) -> QuestionId {
        QuestionId { section: 0, index }
    }

    #[test]
    fn test_duplicate_question_keeps_latest_binding() {
        let mut tables = ReferenceTables::default();
        let age = Id::new("age");

        tables.register_question(age, question_id(0), Span::new(0..5));
        tables.register_question(age, question_id(3), Span::new(20..25));

        assert_eq!(tables.question(age), Some(question_id(3)));
        let duplicates = tables.duplicate_references();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].reference, "q_age");
        assert_eq!(duplicates[0].span, Span::new(20..25));
        assert_eq!(duplicates[0].previous, Some(Span::new(0..5)));
    }

    #[test]
    fn test_answer_tables_are_per_question() {
        let mut tables = ReferenceTables::default();
        let (first, second, yes) = (Id::new("first"), Id::new("second"), Id::new("yes"));
        let first_yes = AnswerId {
            question: question_id(0),
            index: 0,
        };
        let second_yes = AnswerId {
            question: question_id(1),
            index: 0,
        };

        tables.register_answer(first, yes, first_yes, Span::default());
        tables.register_answer(second, yes, second_yes, Span::default());

        assert!(tables.duplicate_references().is_empty());
        assert_eq!(tables.answer(first, yes), Some(first_yes));
        assert_eq!(tables.answer(second, yes), Some(second_yes));
        assert_eq!(tables.answer(Id::new("third"), yes), None);

        tables.register_answer(first, yes, first_yes, Span::default());
        assert_eq!(tables.duplicate_references()[0].reference, "q_first, a_yes");
    }

    #[test]
    fn test_reset_keeps_trace_and_mode() {
        let mut context = Context::new(Trace::new(true), true);
        context.trace.record("survey");
        context.section = Some(2);
        context
            .references
            .record_bad("q_x".to_string(), Span::default());

        context.reset();

        assert!(context.section.is_none());
        assert!(context.references.bad_references().is_empty());
        assert!(context.strict_correct_answers);
        assert_eq!(context.trace.into_entries(), vec!["survey".to_string()]);
    }

    #[test]
    fn test_prune_question_keeps_group() {
        let mut context = Context::default();
        context.group = Some(GroupId {
            section: 0,
            index: 0,
        });
        context.question = Some(question_id(0));
        context.dependency = Some(DependencyOwner::Question(question_id(0)));

        context.prune_question();

        assert!(context.group.is_some());
        assert!(context.question.is_none());
        assert!(context.dependency.is_none());
    }

    #[test]
    fn test_disabled_trace_keeps_nothing() {
        let mut trace = Trace::new(false);
        trace.record("question_age");
        assert!(trace.into_entries().is_empty());
    }
}
