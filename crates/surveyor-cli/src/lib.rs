//! CLI logic for the Surveyor compiler.
//!
//! Reads a survey script, compiles it, and writes the linked survey as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use surveyor::{JsonFileStore, SurveyBuilder, SurveyorError};

use error_adapter::{diagnostic_reportables, render};

/// Run the Surveyor CLI application
///
/// Compiles the input script and writes the survey to the output file. With
/// `--trace`, the trace channel is printed to standard output, one entry per
/// line. Warnings are logged and do not fail the run.
///
/// # Errors
///
/// Returns `SurveyorError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parse errors, including reference errors
/// - Surveys the store rejects
pub fn run(args: &Args) -> Result<(), SurveyorError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Compiling survey"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.trace {
        app_config = app_config.with_trace(true);
    }
    let pretty = app_config.output().pretty();

    let source = fs::read_to_string(&args.input)?;

    let builder = SurveyBuilder::new(app_config);
    let output = builder.parse_all(&source)?;
    for entry in output.trace() {
        println!("{entry}");
    }
    for warning in diagnostic_reportables(output.warnings(), &source) {
        warn!("{}", render(&warning));
    }

    let survey = output
        .into_single()
        .map_err(|err| SurveyorError::new_parse_error(err, source))?;

    let mut store = JsonFileStore::new(&args.output).with_pretty(pretty);
    let key = builder.save(&survey, &mut store)?;

    info!(output_file = key.as_str(); "Survey exported successfully");

    Ok(())
}
