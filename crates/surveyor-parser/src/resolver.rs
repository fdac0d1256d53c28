//! Reference resolution.
//!
//! Dependency conditions and correct-answer markers name questions and answers
//! by symbolic id. They are queued as [`Pending`] when built and resolved when
//! their owner commits: when the next question, group or section starts, when
//! a question, group or section body closes, and at survey close. The tables
//! only ever hold what was declared before the commit, so references point
//! backwards only.

use log::{debug, warn};

use surveyor_core::{
    identifier::Id,
    semantic::{AnswerId, QuestionId},
};

use crate::{
    context::{Context, DependencyOwner, Pending, answer_spelling},
    span::Span,
};

impl Context {
    /// Resolve every pending reference against the current tables.
    pub(crate) fn commit(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return;
        }

        debug!(count = pending.len(); "Committing pending references");
        for entry in pending {
            match entry {
                Pending::Condition { owner, index, span } => {
                    self.resolve_condition(owner, index, span)
                }
                Pending::CorrectAnswer { question, span } => {
                    self.resolve_correct_answer(question, span)
                }
            }
        }
    }

    fn resolve_condition(&mut self, owner: DependencyOwner, index: usize, span: Span) {
        let Some((question_reference, answer_reference)) = self
            .dependency(owner)
            .and_then(|dependency| dependency.conditions().get(index))
            .map(|condition| (condition.question_reference(), condition.answer_reference()))
        else {
            return;
        };

        let question = self.references.question(question_reference);
        let question_spelling = question_reference.question_reference();
        match question {
            Some(_) => self.trace.record(format!("found {question_spelling}")),
            None => {
                self.trace.record(format!("lost {question_spelling}!"));
                self.references.record_bad(question_spelling, span);
            }
        }

        let answer = answer_reference.and_then(|answer_reference| {
            self.resolve_answer(question_reference, answer_reference, span)
        });

        if let Some(condition) = self
            .dependency_mut(owner)
            .and_then(|dependency| dependency.condition_mut(index))
        {
            condition.set_question(question);
            condition.set_answer(answer);
        }
    }

    fn resolve_answer(
        &mut self,
        question_reference: Id,
        answer_reference: Id,
        span: Span,
    ) -> Option<AnswerId> {
        let answer = self.references.answer(question_reference, answer_reference);
        let spelling = answer_reference.answer_reference();
        match answer {
            Some(_) => self.trace.record(format!("found {spelling}")),
            None => {
                self.trace.record(format!("lost {spelling}!"));
                self.references
                    .record_bad(answer_spelling(question_reference, answer_reference), span);
            }
        }
        answer
    }

    /// Resolve a question's correct-answer marker against its own answers.
    ///
    /// A miss is only traced and remembered; it becomes an error in strict mode.
    fn resolve_correct_answer(&mut self, question: QuestionId, span: Span) {
        let Some((reference, correct)) = self
            .survey
            .as_ref()
            .and_then(|survey| survey.question(question))
            .and_then(|q| q.correct().map(|correct| (q.reference(), correct)))
        else {
            return;
        };

        let answer = reference.and_then(|reference| self.references.answer(reference, correct));
        match answer {
            Some(_) => self.trace.record(format!("found correct answer:{correct}")),
            None => {
                self.trace.record(format!("lost! correct answer:{correct}"));
                warn!(correct:%; "Correct answer does not match any answer of its question");
                self.references
                    .record_missed_correct_answer(correct.answer_reference(), span);
            }
        }

        if let Some(q) = self
            .survey
            .as_mut()
            .and_then(|survey| survey.question_mut(question))
        {
            q.set_correct_answer(answer);
        }
    }
}
