//! Configuration types for Surveyor compilation.
//!
//! This module provides the configuration structures that control how survey
//! scripts are interpreted and how compiled surveys are written. All types
//! implement [`serde::Deserialize`] with every field defaulted, so a partial
//! (or empty) configuration file is always valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining parser and output settings.
//! - [`ParserConfig`] - Trace channel and strict correct-answer checking.
//! - [`OutputConfig`] - Formatting of the JSON written by a survey store.
//!
//! # Example
//!
//! ```
//! # use surveyor::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.parser().trace());
//! assert!(config.output().pretty());
//! ```

use serde::Deserialize;

use surveyor_parser::ParseConfig;

/// Top-level application configuration.
///
/// ```toml
/// [parser]
/// trace = false
/// strict_correct_answers = false
///
/// [output]
/// pretty = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(parser: ParserConfig, output: OutputConfig) -> Self {
        Self { parser, output }
    }

    /// Returns the parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Enables or disables the trace channel, e.g. from a `--trace` flag.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.parser.trace = trace;
        self
    }
}

/// Interpreter settings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ParserConfig {
    /// Record the trace channel while interpreting.
    #[serde(default)]
    trace: bool,

    /// Reject surveys whose `correct` markers name no declared answer.
    #[serde(default)]
    strict_correct_answers: bool,
}

impl ParserConfig {
    /// Creates a new [`ParserConfig`].
    pub fn new(trace: bool, strict_correct_answers: bool) -> Self {
        Self {
            trace,
            strict_correct_answers,
        }
    }

    /// Returns whether the trace channel is recorded.
    pub fn trace(&self) -> bool {
        self.trace
    }

    /// Returns whether unresolved correct answers are errors.
    pub fn strict_correct_answers(&self) -> bool {
        self.strict_correct_answers
    }
}

impl From<&ParserConfig> for ParseConfig {
    fn from(config: &ParserConfig) -> Self {
        ParseConfig::new(config.trace, config.strict_correct_answers)
    }
}

/// Output settings for compiled surveys.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    #[serde(default = "default_pretty")]
    pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

impl OutputConfig {
    /// Creates a new [`OutputConfig`].
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Returns whether JSON output is pretty-printed.
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").expect("empty config");
        assert!(!config.parser().trace());
        assert!(!config.parser().strict_correct_answers());
        assert!(config.output().pretty());
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig =
            serde_json::from_str(r#"{"parser": {"strict_correct_answers": true}, "output": {}}"#)
                .expect("partial config");
        assert!(!config.parser().trace());
        assert!(config.parser().strict_correct_answers());
        assert!(config.output().pretty());
    }

    #[test]
    fn test_parse_config_conversion() {
        let config = AppConfig::default().with_trace(true);
        let parse_config = ParseConfig::from(config.parser());
        assert!(parse_config.trace);
        assert!(!parse_config.strict_correct_answers);
    }
}
