//! Surveyor - a questionnaire language compiling survey scripts into linked
//! survey graphs.
//!
//! Scripts are interpreted by [`surveyor_parser`] into [`semantic::Survey`]
//! values, checked with [`validate_survey`], and handed to a
//! [`SurveyStore`].

pub mod config;

mod error;
mod store;
mod validate;

pub use surveyor_core::{identifier, semantic, value};
pub use surveyor_parser::ParseOutput;

pub use error::{PersistenceError, SurveyorError};
pub use store::{JsonFileStore, MemoryStore, SurveyKey, SurveyStore};
pub use validate::validate_survey;

use log::{debug, info, trace};

use surveyor_parser::ParseConfig;

use config::AppConfig;

/// Builder for compiling Surveyor scripts.
///
/// # Examples
///
/// ```rust
/// use surveyor::{MemoryStore, SurveyBuilder, config::AppConfig};
///
/// let source = r#"
///     survey "Coffee" {
///       section "Habits" {
///         q_cups "Cups per day?" { a_one "One"; a_more "More" }
///       }
///     }
/// "#;
///
/// let builder = SurveyBuilder::new(AppConfig::default());
///
/// // Parse source to the node model
/// let survey = builder.parse(source).expect("Failed to parse");
/// assert_eq!(survey.title(), "Coffee");
///
/// // Or parse and persist in one step
/// let mut store = MemoryStore::new();
/// let key = builder.compile(source, &mut store).expect("Failed to compile");
/// assert!(store.get(&key).is_some());
/// ```
#[derive(Debug, Default)]
pub struct SurveyBuilder {
    config: AppConfig,
}

impl SurveyBuilder {
    /// Create a new survey builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the builder's configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a script declaring exactly one survey.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyorError::Parse`] with every diagnostic of the failed
    /// parse, including `E303`/`E304` when the script does not declare
    /// exactly one survey.
    pub fn parse(&self, source: &str) -> Result<semantic::Survey, SurveyorError> {
        self.parse_all(source)?
            .into_single()
            .map_err(|err| SurveyorError::new_parse_error(err, source))
    }

    /// Parse a script into every survey it declares, together with the trace
    /// channel when [`config::ParserConfig::trace`] is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyorError::Parse`] with every diagnostic of the failed
    /// parse.
    pub fn parse_all(&self, source: &str) -> Result<ParseOutput, SurveyorError> {
        info!("Parsing survey script");

        let output = surveyor_parser::parse(source, ParseConfig::from(self.config.parser()))
            .map_err(|err| SurveyorError::new_parse_error(err, source))?;

        debug!(surveys = output.surveys().len(); "Script parsed successfully");
        for entry in output.trace() {
            trace!(entry = entry.as_str(); "Trace");
        }
        for warning in output.warnings() {
            debug!(code:? = warning.code(); "{warning}");
        }

        Ok(output)
    }

    /// Hand a survey to a store.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyorError::Persistence`] carrying every message the
    /// store reported.
    pub fn save(
        &self,
        survey: &semantic::Survey,
        store: &mut dyn SurveyStore,
    ) -> Result<SurveyKey, SurveyorError> {
        info!(title = survey.title(); "Saving survey");
        let key = store.save(survey).map_err(PersistenceError::new)?;
        debug!(key = key.as_str(); "Survey saved");
        Ok(key)
    }

    /// Parse a single-survey script and save the result.
    ///
    /// # Errors
    ///
    /// Parse errors as [`SurveyBuilder::parse`], store errors as
    /// [`SurveyBuilder::save`].
    pub fn compile(
        &self,
        source: &str,
        store: &mut dyn SurveyStore,
    ) -> Result<SurveyKey, SurveyorError> {
        let survey = self.parse(source)?;
        self.save(&survey, store)
    }
}
