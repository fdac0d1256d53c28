//! Diagnostics: one message about a script, pointing into its source.

use std::fmt;

use crate::{error::ErrorCode, span::Span};

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The script is rejected; no survey comes out of it.
    Error,
    /// The survey is produced anyway. Lenient correct-answer checking reports
    /// its misses this way.
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        *self == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        *self == Severity::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// A message attached to a stretch of source.
///
/// A diagnostic has primary labels on the statement at fault and secondary
/// labels on related statements, such as the first declaration of a reused
/// reference id:
///
/// ```text
/// error[E301]: duplicate reference `q_age`
///   --> intake.survey:9:5
///    |
///  9 |     q_age "Your age?"
///    |     ^^^^^^^^^^^^^^^^^ declared again here
///    |
///  3 |     q_age "How old are you?"
///    |     ------------------------ previously declared here
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            primary: false,
            ..Self::primary(span, message)
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.primary
    }
}

/// One finding about a script: severity, code, message, labels and help.
///
/// Built fluently:
///
/// ```
/// # use surveyor_parser::error::{Diagnostic, ErrorCode};
/// # use surveyor_parser::Span;
/// let diag = Diagnostic::error("a survey section cannot be empty")
///     .with_code(ErrorCode::E200)
///     .with_label(Span::new(0..7), "declared without a body")
///     .with_help("add a body: `section \"Title\" { ... }`");
///
/// assert_eq!(diag.to_string(), "error[E200]: a survey section cannot be empty");
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message)
    }

    fn with_severity(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Point at the statement at fault.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Point at a related statement.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{code}]: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}
