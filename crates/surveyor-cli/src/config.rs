//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use surveyor::{SurveyorError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for SurveyorError {
    fn from(err: ConfigError) -> Self {
        SurveyorError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (surveyor/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SurveyorError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("surveyor/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "surveyor", "surveyor") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, SurveyorError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<AppConfig, SurveyorError> {
    toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [parser]
            trace = true
            strict_correct_answers = true

            [output]
            pretty = false
            "#,
        )
        .expect("valid config");

        assert!(config.parser().trace());
        assert!(config.parser().strict_correct_answers());
        assert!(!config.output().pretty());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").expect("empty config");
        assert!(!config.parser().trace());
        assert!(config.output().pretty());
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = parse_config("[parser]\ntrace = \"yes\"").expect_err("wrong type");
        assert!(matches!(err, SurveyorError::Config(_)));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_config(Some(dir.path().join("missing.toml"))).expect_err("missing file");
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\npretty = false\n").expect("write config");

        let config = load_config(Some(&path)).expect("config loads");
        assert!(!config.output().pretty());
    }
}
