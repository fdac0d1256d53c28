//! Integration tests for the SurveyBuilder API
//!
//! These tests verify that the public API works end to end, from script text
//! to a stored survey.

use std::fs;

use surveyor::{
    JsonFileStore, MemoryStore, SurveyBuilder, SurveyorError,
    config::{AppConfig, OutputConfig, ParserConfig},
};
use surveyor_parser::error::ErrorCode;

const COFFEE: &str = r#"
    survey "Coffee habits" {
      section "Drinking" {
        q_drinks "Do you drink coffee?" {
          a_yes "Yes"
          a_no "No"
        }
        q_cups "How many cups a day?" {
          d { dc_A :q_drinks, "==", :a_yes }
          a_cups "Cups", :integer
          v rule: "A and B"
          vc_A ">=", integer_value: 1
          vc_B "<=", integer_value: 20
        }
      }
    }
"#;

#[test]
fn test_builder_api_exists() {
    let _builder = SurveyBuilder::default();
}

#[test]
fn test_parse_simple_survey() {
    let builder = SurveyBuilder::default();
    let survey = builder.parse(COFFEE).expect("Failed to parse survey");

    assert_eq!(survey.title(), "Coffee habits");
    assert_eq!(survey.sections()[0].questions().len(), 2);
}

#[test]
fn test_parse_invalid_syntax_returns_error() {
    let builder = SurveyBuilder::default();
    let result = builder.parse("survey \"S\" { section \"A\" { q ( } }");

    match result {
        Err(SurveyorError::Parse { err, src }) => {
            assert!(!err.diagnostics().is_empty());
            assert!(src.contains("survey"));
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
}

#[test]
fn test_parse_all_keeps_every_survey_and_the_trace() {
    let source = format!("{COFFEE}\nsurvey \"Second\" {{ section \"Only\" {{ q \"Fine?\" }} }}");
    let builder = SurveyBuilder::new(AppConfig::default().with_trace(true));

    let output = builder.parse_all(&source).expect("Failed to parse");
    assert_eq!(output.surveys().len(), 2);
    assert!(output.trace().iter().any(|entry| entry == "found q_drinks"));

    match builder.parse(&source) {
        Err(SurveyorError::Parse { err, .. }) => assert!(err.has_code(ErrorCode::E304)),
        other => panic!("Expected E304, got {other:?}"),
    }
}

#[test]
fn test_compile_into_memory_store() {
    let builder = SurveyBuilder::default();
    let mut store = MemoryStore::new();

    let key = builder.compile(COFFEE, &mut store).expect("Failed to compile");
    let stored = store.get(&key).expect("Survey is stored");
    assert_eq!(stored.title(), "Coffee habits");
}

#[test]
fn test_compile_surfaces_every_validation_message() {
    let source = r#"
        survey "" {
          section "Checks" {
            q_a "" { a_x "X" }
            q_b "B" {
              d rule: "A or Z" { dc_A :q_a, "~~", :a_x }
            }
          }
        }
    "#;

    let builder = SurveyBuilder::default();
    let mut store = MemoryStore::new();

    match builder.compile(source, &mut store) {
        Err(SurveyorError::Persistence(err)) => {
            assert_eq!(
                err.messages(),
                [
                    "survey title is blank",
                    "q_a text is blank",
                    "dependency of q_b: unknown operator `~~`",
                    "dependency of q_b: rule `A or Z` names unknown key `Z`",
                ]
            );
        }
        other => panic!("Expected persistence error, got {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn test_strict_correct_answers_from_config() {
    let source = r#"
        survey "Quiz" {
          section "Sky" {
            q_sky "Sky color?", correct: :a_green { a_blue "Blue" }
          }
        }
    "#;

    assert!(SurveyBuilder::default().parse(source).is_ok());

    let strict = SurveyBuilder::new(AppConfig::new(
        ParserConfig::new(false, true),
        OutputConfig::default(),
    ));
    match strict.parse(source) {
        Err(SurveyorError::Parse { err, .. }) => assert!(err.has_code(ErrorCode::E302)),
        other => panic!("Expected E302, got {other:?}"),
    }
}

#[test]
fn test_compile_to_json_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("coffee.json");

    let builder = SurveyBuilder::default();
    let mut store = JsonFileStore::new(&path);
    builder.compile(COFFEE, &mut store).expect("Failed to compile");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("written")).expect("valid JSON");
    let condition = &json["sections"][0]["questions"][1]["dependency"]["conditions"][0];
    assert_eq!(condition["operator"], "==");
    assert_eq!(condition["question"]["index"], 0);
    assert_eq!(condition["answer"]["index"], 0);
}

#[test]
fn test_builder_reusability() {
    let builder = SurveyBuilder::default();

    let first = builder.parse(COFFEE).expect("Failed to parse first");
    let second = builder.parse(COFFEE).expect("Failed to parse second");

    assert_eq!(first, second);
}
