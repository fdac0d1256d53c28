//! Error types for Surveyor operations.
//!
//! This module provides the main error type [`SurveyorError`] which wraps the
//! error conditions that can occur while compiling and persisting surveys.

use std::{fmt, io};

use thiserror::Error;

use surveyor_parser::error::ParseError;

/// The main error type for Surveyor operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries structured diagnostics with source spans
/// alongside the source text, so callers can render rich reports.
#[derive(Debug, Error)]
pub enum SurveyorError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SurveyorError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

/// A survey store refused a survey.
///
/// Carries every human readable message the store reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct PersistenceError {
    messages: Vec<String>,
}

impl PersistenceError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.messages.as_slice() {
            [] => write!(f, "survey was rejected"),
            [message] => write!(f, "{message}"),
            messages => write!(f, "{} problems: {}", messages.len(), messages.join("; ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_display() {
        assert_eq!(
            PersistenceError::new(vec!["survey title is blank".to_string()]).to_string(),
            "survey title is blank"
        );

        let err = SurveyorError::from(PersistenceError::new(vec![
            "one".to_string(),
            "two".to_string(),
        ]));
        assert_eq!(err.to_string(), "Persistence error: 2 problems: one; two");
    }
}
