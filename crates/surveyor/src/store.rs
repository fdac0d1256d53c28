//! Survey persistence.
//!
//! A [`SurveyStore`] accepts compiled surveys and hands back a key. Every
//! store validates with [`validate_survey`] before it keeps anything, and
//! reports problems as human readable messages.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;

use surveyor_core::semantic::Survey;

use crate::validate::validate_survey;

/// Identifies a saved survey within its store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SurveyKey(String);

impl SurveyKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurveyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Destination for compiled surveys.
pub trait SurveyStore {
    /// Validate and keep a survey.
    ///
    /// # Errors
    ///
    /// Every problem found, one message each. Nothing is kept on error.
    fn save(&mut self, survey: &Survey) -> Result<SurveyKey, Vec<String>>;
}

/// In-memory store assigning sequential keys (`survey-1`, `survey-2`, ...).
#[derive(Debug, Default)]
pub struct MemoryStore {
    surveys: IndexMap<SurveyKey, Survey>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SurveyKey) -> Option<&Survey> {
        self.surveys.get(key)
    }

    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }

    /// Saved surveys in the order they were saved.
    pub fn iter(&self) -> impl Iterator<Item = (&SurveyKey, &Survey)> {
        self.surveys.iter()
    }
}

impl SurveyStore for MemoryStore {
    fn save(&mut self, survey: &Survey) -> Result<SurveyKey, Vec<String>> {
        let messages = validate_survey(survey);
        if !messages.is_empty() {
            debug!(problems = messages.len(); "Memory store rejected survey");
            return Err(messages);
        }

        let key = SurveyKey::new(format!("survey-{}", self.surveys.len() + 1));
        self.surveys.insert(key.clone(), survey.clone());
        debug!(key = key.as_str(); "Survey kept in memory");
        Ok(key)
    }
}

/// Store writing each survey as JSON to one file path.
///
/// Saving again overwrites the file. The key is the path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    /// Create a store writing pretty-printed JSON to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_json(&self, survey: &Survey) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(survey)
        } else {
            serde_json::to_string(survey)
        }
    }
}

impl SurveyStore for JsonFileStore {
    fn save(&mut self, survey: &Survey) -> Result<SurveyKey, Vec<String>> {
        let messages = validate_survey(survey);
        if !messages.is_empty() {
            return Err(messages);
        }

        let json = self
            .to_json(survey)
            .map_err(|err| vec![format!("failed to serialize survey: {err}")])?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    vec![format!("failed to create {}: {err}", parent.display())]
                })?;
            }
        }
        fs::write(&self.path, json)
            .map_err(|err| vec![format!("failed to write {}: {err}", self.path.display())])?;

        let key = SurveyKey::new(self.path.display().to_string());
        info!(path = key.as_str(); "Survey written");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use surveyor_core::semantic::{Answer, Question, SurveySection};

    use super::*;

    fn sample_survey(title: &str) -> Survey {
        let mut question = Question::new("Coffee or tea?");
        question.add_answer(Answer::new("Coffee"));
        question.add_answer(Answer::new("Tea"));

        let mut section = SurveySection::new("Drinks");
        section.add_question(question);

        let mut survey = Survey::new(title);
        survey.add_section(section);
        survey
    }

    #[test]
    fn test_memory_store_assigns_sequential_keys() {
        let mut store = MemoryStore::new();
        let first = store.save(&sample_survey("One")).expect("valid survey");
        let second = store.save(&sample_survey("Two")).expect("valid survey");

        assert_eq!(first.as_str(), "survey-1");
        assert_eq!(second.as_str(), "survey-2");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&second).map(Survey::title), Some("Two"));
    }

    #[test]
    fn test_memory_store_rejects_invalid_survey() {
        let mut store = MemoryStore::new();
        let messages = store.save(&sample_survey(" ")).expect_err("blank title");

        assert_eq!(messages, vec!["survey title is blank".to_string()]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_file_store_writes_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out").join("survey.json");
        let mut store = JsonFileStore::new(&path);

        let key = store.save(&sample_survey("Drinks")).expect("saved");
        assert_eq!(key.as_str(), path.display().to_string());

        let written = fs::read_to_string(&path).expect("file written");
        let json: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
        assert_eq!(json["title"], "Drinks");
        assert_eq!(json["sections"][0]["questions"][0]["answers"][1]["text"], "Tea");
        assert!(written.contains('\n'));
    }

    #[test]
    fn test_json_file_store_compact() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("survey.json");
        let mut store = JsonFileStore::new(&path).with_pretty(false);

        store.save(&sample_survey("Drinks")).expect("saved");
        let written = fs::read_to_string(&path).expect("file written");
        assert!(!written.contains('\n'));
    }

    #[test]
    fn test_json_file_store_does_not_write_invalid_survey() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("survey.json");
        let mut store = JsonFileStore::new(&path);

        assert!(store.save(&sample_survey("")).is_err());
        assert!(!path.exists());
    }
}
