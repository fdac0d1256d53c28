//! The error a rejected script produces, and the collector that builds it.

use std::fmt;

use crate::error::{Diagnostic, ErrorCode};

/// What builders and the interpreter return: the first structural problem
/// aborts, so one diagnostic is enough.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// A rejected script.
///
/// Holds one diagnostic for a structural or syntax problem, every lexical
/// error of the script, or every reference error of the failing survey.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any diagnostic carries `code`.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.diagnostics.iter().any(|d| d.code() == Some(code))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagnostics.as_slice() {
            [] => f.write_str("script rejected"),
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => write!(f, "{first} (+{} more)", rest.len()),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}

/// Gathers every diagnostic of a phase that keeps going after a problem:
/// the lexer, and the finalizer's reference checks.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Fail with everything collected if any error was emitted, otherwise
    /// hand back the warnings.
    pub fn finish(self) -> std::result::Result<Vec<Diagnostic>, ParseError> {
        if self.diagnostics.iter().any(|d| d.severity().is_error()) {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
