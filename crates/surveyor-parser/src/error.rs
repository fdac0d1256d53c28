//! Error and diagnostic system for the Surveyor parser.
//!
//! Every problem is a [`Diagnostic`]: a severity, an [`ErrorCode`], a message,
//! labeled source spans and optional help. A rejected script yields a
//! [`ParseError`] wrapping one or more of them; a script that only drew
//! warnings yields its surveys along with the warnings.
//!
//! Structural problems (a section without a body, an answer outside any
//! question) stop interpretation at the offending statement. Reference problems
//! are accumulated and reported together once the survey closes, so a single
//! [`ParseError`] may carry many diagnostics.
//!
//! # Example
//!
//! ```
//! # use surveyor_parser::error::{Diagnostic, ErrorCode};
//! # use surveyor_parser::Span;
//!
//! let span = Span::new(100..120);
//! let first_span = Span::new(50..70);
//!
//! let diag = Diagnostic::error("duplicate reference `q_age`")
//!     .with_code(ErrorCode::E301)
//!     .with_label(span, "declared again here")
//!     .with_secondary_label(first_span, "first declared here")
//!     .with_help("give each question a unique reference id");
//! ```

mod diagnostic;
mod error_code;
mod parse_error;

pub(crate) use parse_error::{DiagnosticCollector, Result};

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
