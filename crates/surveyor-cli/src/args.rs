//! Command-line argument definitions for the Surveyor CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, the trace channel, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Surveyor compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input survey script
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "survey.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the trace channel to standard output
    #[arg(long)]
    pub trace: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
