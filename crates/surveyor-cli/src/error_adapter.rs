//! Error adapter for rendering Surveyor problems as miette reports.
//!
//! Parser diagnostics keep their source snippets and labels, and warnings
//! render as warnings. Each diagnostic of a [`ParseError`] becomes its own
//! report, so every bad and duplicate reference of a survey is shown. A store
//! rejection becomes one report per message.
//!
//! [`ParseError`]: surveyor_parser::error::ParseError

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, Severity as MietteSeverity,
    SourceSpan,
};

use surveyor::SurveyorError;
use surveyor_parser::{
    Span,
    error::{Diagnostic, Severity},
};

/// A single renderable problem.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parser diagnostic with the script it points into.
    Diagnostic { diag: &'a Diagnostic, src: &'a str },
    /// One message of a store rejection.
    Rejection(&'a str),
    /// Any other error, without source location.
    Error(&'a SurveyorError),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic { diag, .. } => f.write_str(diag.message()),
            Reportable::Rejection(message) => f.write_str(message),
            Reportable::Error(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code: Box<dyn fmt::Display + 'a> = match self {
            Reportable::Diagnostic { diag, .. } => Box::new(diag.code()?),
            Reportable::Rejection(_) => Box::new("surveyor::persistence"),
            Reportable::Error(SurveyorError::Io(_)) => Box::new("surveyor::io"),
            Reportable::Error(SurveyorError::Config(_)) => Box::new("surveyor::config"),
            Reportable::Error(SurveyorError::Persistence(_)) => Box::new("surveyor::persistence"),
            Reportable::Error(SurveyorError::Parse { .. }) => return None,
        };
        Some(code)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic { diag, .. } => Some(match diag.severity() {
                Severity::Error => MietteSeverity::Error,
                Severity::Warning => MietteSeverity::Warning,
            }),
            _ => Some(MietteSeverity::Error),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic { diag, .. } => {
                diag.help().map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
            }
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Reportable::Diagnostic { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }

        Some(Box::new(diag.labels().iter().map(|label| {
            let message = Some(label.message().to_string());
            let span = to_source_span(label.span());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Split an error into the reports it should be shown as.
pub fn to_reportables(err: &SurveyorError) -> Vec<Reportable<'_>> {
    match err {
        SurveyorError::Parse { err, src } => diagnostic_reportables(err.diagnostics(), src),
        SurveyorError::Persistence(rejection) if !rejection.messages().is_empty() => rejection
            .messages()
            .iter()
            .map(|message| Reportable::Rejection(message))
            .collect(),
        _ => vec![Reportable::Error(err)],
    }
}

/// Reports for diagnostics of a script, e.g. the warnings of a successful
/// parse.
pub fn diagnostic_reportables<'a>(diagnostics: &'a [Diagnostic], src: &'a str) -> Vec<Reportable<'a>> {
    diagnostics
        .iter()
        .map(|diag| Reportable::Diagnostic { diag, src })
        .collect()
}

/// Render a report as text, falling back to its message if rendering fails.
pub fn render(reportable: &Reportable<'_>) -> String {
    let mut out = String::new();
    if GraphicalReportHandler::new()
        .render_report(&mut out, reportable)
        .is_err()
    {
        out = reportable.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use surveyor::PersistenceError;
    use surveyor_parser::error::{ErrorCode, ParseError};

    use super::*;

    fn code_of(reportable: &Reportable<'_>) -> Option<String> {
        reportable.code().map(|c| c.to_string())
    }

    #[test]
    fn test_each_diagnostic_is_a_report() {
        let parse_err = ParseError::from(vec![
            Diagnostic::error("bad reference `q_a`")
                .with_code(ErrorCode::E300)
                .with_label(Span::new(0..5), "referenced here"),
            Diagnostic::error("duplicate reference `q_b`")
                .with_code(ErrorCode::E301)
                .with_label(Span::new(10..15), "declared again here")
                .with_help("give each question its own reference id"),
        ]);
        let err = SurveyorError::new_parse_error(parse_err, "source code here...");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "bad reference `q_a`");
        assert_eq!(code_of(&reportables[1]).as_deref(), Some("E301"));
        assert!(reportables[1].help().is_some());
    }

    #[test]
    fn test_labels_keep_their_role() {
        let diag = Diagnostic::error("duplicate reference `q_a`")
            .with_label(Span::new(10..15), "declared again here")
            .with_secondary_label(Span::new(0..5), "previously declared here");
        let reportable = Reportable::Diagnostic {
            diag: &diag,
            src: "q_a 1\nq_a 2\n...",
        };

        let labels: Vec<_> = reportable.labels().expect("labels").collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert_eq!(labels[0].offset(), 10);
        assert!(!labels[1].primary());
        assert_eq!(labels[1].label(), Some("previously declared here"));
    }

    #[test]
    fn test_warning_severity() {
        let diag = Diagnostic::warning("unresolved correct answer `a_green`")
            .with_code(ErrorCode::E302);
        let reportables = diagnostic_reportables(std::slice::from_ref(&diag), "");

        assert_eq!(reportables[0].severity(), Some(MietteSeverity::Warning));
    }

    #[test]
    fn test_rejection_messages_are_separate_reports() {
        let err = SurveyorError::from(PersistenceError::new(vec![
            "survey title is blank".to_string(),
            "q_a text is blank".to_string(),
        ]));

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[1].to_string(), "q_a text is blank");
        assert_eq!(code_of(&reportables[0]).as_deref(), Some("surveyor::persistence"));
    }

    #[test]
    fn test_other_errors() {
        let err = SurveyorError::Config("bad toml".to_string());

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].to_string(), "Configuration error: bad toml");
        assert_eq!(code_of(&reportables[0]).as_deref(), Some("surveyor::config"));
        assert!(reportables[0].source_code().is_none());
    }

    #[test]
    fn test_render_includes_message() {
        let err = SurveyorError::Config("bad toml".to_string());
        let rendered = render(&to_reportables(&err)[0]);
        assert!(rendered.contains("bad toml"));
    }
}
