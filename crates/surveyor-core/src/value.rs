//! Literal argument values.
//!
//! Every statement of a survey script carries a list of arguments. After
//! parsing, each argument is one of the [`Value`] variants defined here.
//! Builders inspect values with the typed accessors, which report a
//! [`ValueError`] when an argument has the wrong shape.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// An ordered keyword map, as written with `key: value` pairs or `{ ... }`.
pub type ValueMap = IndexMap<String, Value>;

/// A literal value appearing as a statement argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// `nil`
    Nil,
    /// `true` or `false`
    Bool(bool),
    /// Integer literal
    Integer(i64),
    /// Floating point literal
    Float(f64),
    /// Quoted string literal
    String(String),
    /// Symbol literal (`:name`), stored without the leading colon
    Symbol(String),
    /// Array literal
    List(Vec<Value>),
    /// Keyword map
    Map(ValueMap),
}

/// Error returned when a [`Value`] does not have the shape a builder expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ValueError {
    expected: &'static str,
    found: &'static str,
}

impl ValueError {
    fn new(expected: &'static str, value: &Value) -> Self {
        Self {
            expected,
            found: value.kind_name(),
        }
    }

    /// What the caller asked for.
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// What the value actually was.
    pub fn found(&self) -> &'static str {
        self.found
    }
}

impl Value {
    /// Short human-readable name of the value's kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Returns the contents of a string literal.
    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(ValueError::new("string", other)),
        }
    }

    /// Returns the name of a symbol literal.
    pub fn as_symbol(&self) -> Result<&str, ValueError> {
        match self {
            Value::Symbol(s) => Ok(s),
            other => Err(ValueError::new("symbol", other)),
        }
    }

    /// Returns the text of either a string or a symbol.
    ///
    /// Reference arguments such as `:q_age` and `"q_age"` are interchangeable,
    /// so builders that accept a name use this accessor.
    pub fn as_name(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(s) | Value::Symbol(s) => Ok(s),
            other => Err(ValueError::new("string or symbol", other)),
        }
    }

    /// Returns the keyword map.
    pub fn as_map(&self) -> Result<&ValueMap, ValueError> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(ValueError::new("map", other)),
        }
    }

    /// Returns the boolean, treating `nil` as `false`.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Nil => Ok(false),
            other => Err(ValueError::new("boolean", other)),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(s) => write!(f, ":{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Turns a symbol name into display text: underscores become spaces and the
/// first letter is capitalized (`other_and_string` → `Other and string`).
pub fn humanize(name: &str) -> String {
    let spaced = name.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("none"), "None");
        assert_eq!(humanize("datetime"), "Datetime");
        assert_eq!(humanize("other_and_string"), "Other and string");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_accessors() {
        let text = Value::from("Under 18");
        assert_eq!(text.as_str(), Ok("Under 18"));
        assert_eq!(text.as_name(), Ok("Under 18"));

        let symbol = Value::Symbol("q_age".to_string());
        assert_eq!(symbol.as_name(), Ok("q_age"));
        let err = symbol.as_str().unwrap_err();
        assert_eq!(err.expected(), "string");
        assert_eq!(err.found(), "symbol");
    }

    #[test]
    fn test_as_bool_treats_nil_as_false() {
        assert_eq!(Value::Nil.as_bool(), Ok(false));
        assert_eq!(Value::Bool(true).as_bool(), Ok(true));
        assert!(Value::Integer(1).as_bool().is_err());
    }

    #[test]
    fn test_display() {
        let mut map = ValueMap::new();
        map.insert("pick".to_string(), Value::Symbol("one".to_string()));
        map.insert("count".to_string(), Value::Integer(2));
        let value = Value::List(vec![Value::from("a"), Value::Map(map), Value::Nil]);
        assert_eq!(value.to_string(), r#"["a", {pick: :one, count: 2}, nil]"#);
    }

    #[test]
    fn test_error_message() {
        let err = Value::Integer(3).as_map().unwrap_err();
        assert_eq!(err.to_string(), "expected map, found integer");
    }
}
