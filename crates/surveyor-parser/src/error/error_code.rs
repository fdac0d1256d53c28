//! Error codes for the Surveyor diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Structural errors raised while interpreting statements
//! - `E3xx` - Reference and survey-level errors raised when a survey closes

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    E001,

    /// Unexpected character.
    E002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are: `\n`, `\r`, `\t`, `\b`, `\f`, `\\`, `\/`, `\'`, `\"`, `\0`, `\u{...}`.
    E003,

    /// Invalid unicode escape format.
    ///
    /// Unicode escapes must use the format `\u{XXXX}` with 1-6 hexadecimal digits.
    E004,

    /// Invalid unicode codepoint.
    ///
    /// Valid codepoints are 0x0000-0xD7FF and 0xE000-0x10FFFF.
    E005,

    /// Empty unicode escape `\u{}`.
    E006,

    /// Number literal out of range.
    ///
    /// Integers must fit in 64 signed bits and floats must be finite.
    E007,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Incomplete input.
    E101,

    // =========================================================================
    // Structural Errors (E2xx)
    // =========================================================================
    /// Empty block.
    ///
    /// A survey, section or question group was declared without a body.
    E200,

    /// Unexpected block.
    ///
    /// An answer, condition or validation was given a body.
    E201,

    /// Unknown verb.
    E202,

    /// Missing enclosing node.
    ///
    /// A statement appeared outside the node it must belong to, e.g. an answer
    /// with no open question or a section outside a survey.
    E203,

    /// Invalid argument.
    ///
    /// An argument has the wrong shape for its statement.
    E204,

    // =========================================================================
    // Reference Errors (E3xx)
    // =========================================================================
    /// Bad reference.
    ///
    /// A dependency condition names a question or answer that was not declared
    /// earlier in the survey.
    E300,

    /// Duplicate reference.
    ///
    /// A reference id was reused where it must be unique.
    E301,

    /// Unresolved correct answer.
    ///
    /// An error under strict correct-answer checking, a warning otherwise.
    E302,

    /// The script declares no survey.
    E303,

    /// The script declares more than one survey where exactly one was expected.
    E304,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E007 => "E007",
            // Parser errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            // Structural errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            // Reference errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "invalid unicode escape",
            ErrorCode::E005 => "invalid unicode codepoint",
            ErrorCode::E006 => "empty unicode escape",
            ErrorCode::E007 => "number literal out of range",
            // Parser errors
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            // Structural errors
            ErrorCode::E200 => "empty block",
            ErrorCode::E201 => "unexpected block",
            ErrorCode::E202 => "unknown verb",
            ErrorCode::E203 => "missing enclosing node",
            ErrorCode::E204 => "invalid argument",
            // Reference errors
            ErrorCode::E300 => "bad reference",
            ErrorCode::E301 => "duplicate reference",
            ErrorCode::E302 => "unresolved correct answer",
            ErrorCode::E303 => "no survey declared",
            ErrorCode::E304 => "multiple surveys declared",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
