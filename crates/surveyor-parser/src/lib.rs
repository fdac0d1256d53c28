//! # Surveyor Parser
//!
//! Interpreter for the Surveyor questionnaire language. This crate turns
//! script text into linked [`Survey`] graphs.
//!
//! ## Usage
//!
//! ```
//! # use surveyor_parser::{parse_survey, ParseConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         survey "Intake" {
//!           section "About you" {
//!             q_age "How old are you?" {
//!               a_under "Under 18"
//!               a_over "18 or older"
//!             }
//!             q_drink "Do you drink coffee?" {
//!               d { dc_A :q_age, "==", :a_over }
//!               a_yes "Yes"
//!               a_no "No"
//!             }
//!           }
//!         }
//!     "#;
//!
//!     let survey = parse_survey(source, ParseConfig::default())?;
//!     assert_eq!(survey.sections()[0].questions().len(), 2);
//!     Ok(())
//! }
//! ```

mod builders;
mod context;
mod dispatch;
pub mod error;
mod finalizer;
mod lexer;
mod parser;
mod parser_types;
mod resolver;
mod span;
mod tokens;
mod verb;

pub use span::Span;

use log::{info, trace};

use surveyor_core::semantic::Survey;

use dispatch::Interpreter;
use error::{Diagnostic, ErrorCode, ParseError};

/// Configuration for one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseConfig {
    /// Keep the trace channel messages in [`ParseOutput::trace`]
    pub trace: bool,
    /// Reject correct-answer markers that match no answer of their question
    pub strict_correct_answers: bool,
}

impl ParseConfig {
    /// Create a new ParseConfig with the given flags
    pub fn new(trace: bool, strict_correct_answers: bool) -> Self {
        Self {
            trace,
            strict_correct_answers,
        }
    }
}

/// Every survey of a script, plus the trace and any warnings.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    surveys: Vec<Survey>,
    spans: Vec<Span>,
    trace: Vec<String>,
    warnings: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn surveys(&self) -> &[Survey] {
        &self.surveys
    }

    pub fn into_surveys(self) -> Vec<Survey> {
        self.surveys
    }

    /// Trace channel messages, empty unless [`ParseConfig::trace`] is set.
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Diagnostics that did not reject the script, such as correct-answer
    /// markers that matched nothing outside strict mode.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// The only survey of the script.
    ///
    /// # Errors
    ///
    /// `E303` when the script declares no survey, `E304` when it declares
    /// several.
    pub fn into_single(mut self) -> Result<Survey, ParseError> {
        match self.surveys.len() {
            1 => Ok(self.surveys.remove(0)),
            0 => Err(Diagnostic::error("the script declares no survey")
                .with_code(ErrorCode::E303)
                .with_help("wrap the script in `survey \"Title\" { ... }`")
                .into()),
            count => {
                let diagnostic = Diagnostic::error(format!(
                    "the script declares {count} surveys, expected exactly one"
                ))
                .with_code(ErrorCode::E304)
                .with_help("split the surveys into separate scripts, or parse them with `parse`");
                let diagnostic = self.spans[1..]
                    .iter()
                    .fold(diagnostic, |diagnostic, span| {
                        diagnostic.with_label(*span, "another survey declared here")
                    })
                    .with_secondary_label(self.spans[0], "first survey declared here");
                Err(diagnostic.into())
            }
        }
    }
}

/// Parse a script into every survey it declares.
///
/// The pipeline:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build the statement tree from tokens
/// 3. **Interpret** - Dispatch statements to builders, resolving references
///    as questions commit and finalizing each survey as it closes
///
/// # Errors
///
/// Returns a [`ParseError`] holding every lexical error, the first syntax or
/// structural error, or every reference error of the first failing survey.
pub fn parse(source: &str, config: ParseConfig) -> Result<ParseOutput, ParseError> {
    info!(bytes = source.len(); "Parsing survey script");

    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;
    trace!(tokens = tokens.len(); "Tokenized");

    // Step 2: Parse
    let statements = parser::build_script(&tokens)?;
    trace!(statements:?; "Parsed statements");

    // Step 3: Interpret
    let interpretation = Interpreter::new(config).run(&statements)?;
    info!(
        surveys = interpretation.surveys.len(),
        warnings = interpretation.warnings.len();
        "Script interpreted"
    );

    let (surveys, spans): (Vec<Survey>, Vec<Span>) = interpretation
        .surveys
        .into_iter()
        .map(|survey| {
            let span = survey.span();
            (survey.into_inner(), span)
        })
        .unzip();

    Ok(ParseOutput {
        surveys,
        spans,
        trace: interpretation.trace,
        warnings: interpretation.warnings,
    })
}

/// Parse a script that declares exactly one survey.
///
/// # Example
///
/// ```
/// # use surveyor_parser::{parse_survey, ParseConfig};
///
/// let survey = parse_survey(r#"survey "Empty" { section "Intro" {} }"#, ParseConfig::default());
/// assert!(survey.is_ok());
///
/// let missing = parse_survey("", ParseConfig::default());
/// assert!(missing.is_err());
/// ```
pub fn parse_survey(source: &str, config: ParseConfig) -> Result<Survey, ParseError> {
    parse(source, config)?.into_single()
}
