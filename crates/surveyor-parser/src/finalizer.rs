//! Survey finalizer.
//!
//! Runs when a survey body closes: commits the last pending references, fills
//! omitted dependency rules, and rejects the survey if any reference went
//! wrong. Every bad reference is reported, then every duplicate, then every
//! correct-answer marker that matched nothing. The last are errors only under
//! strict checking and warnings otherwise.

use log::{debug, info};

use surveyor_core::semantic::Survey;

use crate::{
    context::{Context, ReferenceIssue},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

fn bad_reference(issue: &ReferenceIssue) -> Diagnostic {
    Diagnostic::error(format!("bad reference `{}`", issue.reference))
        .with_code(ErrorCode::E300)
        .with_label(issue.span, "referenced here")
        .with_help("questions and answers must be declared before they are referenced")
}

fn duplicate_reference(issue: &ReferenceIssue) -> Diagnostic {
    let diagnostic = Diagnostic::error(format!("duplicate reference `{}`", issue.reference))
        .with_code(ErrorCode::E301)
        .with_label(issue.span, "declared again here")
        .with_help("give each question, and each answer within a question, its own reference id");
    match issue.previous {
        Some(previous) => diagnostic.with_secondary_label(previous, "previously declared here"),
        None => diagnostic,
    }
}

fn unresolved_correct_answer(issue: &ReferenceIssue, strict: bool) -> Diagnostic {
    let message = format!("unresolved correct answer `{}`", issue.reference);
    let diagnostic = if strict {
        Diagnostic::error(message)
    } else {
        Diagnostic::warning(message)
    };
    diagnostic
        .with_code(ErrorCode::E302)
        .with_label(issue.span, "marked correct here")
        .with_help("the correct answer must be an answer of the same question, and the question needs a reference id")
}

/// Close the survey under construction and hand it out with its warnings.
pub(crate) fn finalize(
    ctx: &mut Context,
    span: Span,
) -> Result<(Survey, Vec<Diagnostic>), ParseError> {
    ctx.commit();

    let Some(mut survey) = ctx.survey.take() else {
        return Err(Diagnostic::error("survey closed before it was opened")
            .with_code(ErrorCode::E203)
            .with_label(span, "here")
            .into());
    };

    for dependency in survey.dependencies_mut() {
        let omitted_rule = dependency
            .rule()
            .is_none()
            .then(|| dependency.default_rule())
            .flatten();
        if let Some(rule) = omitted_rule {
            dependency.set_rule(rule);
        }
    }

    let references = &ctx.references;
    let mut collector = DiagnosticCollector::new();
    for issue in references.bad_references() {
        collector.emit(bad_reference(issue));
    }
    for issue in references.duplicate_references() {
        collector.emit(duplicate_reference(issue));
    }
    for issue in references.missed_correct_answers() {
        collector.emit(unresolved_correct_answer(issue, ctx.strict_correct_answers));
    }

    let result = collector.finish();
    ctx.reset();
    let warnings = result?;

    info!(title = survey.title(), sections = survey.sections().len(); "Survey finalized");
    debug!(questions = survey.questions().count(), warnings = warnings.len(); "Survey stats");
    Ok((survey, warnings))
}
