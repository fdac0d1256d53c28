//! Symbolic reference identifiers.
//!
//! Authors attach short names to questions and answers (the `age` in `q_age`,
//! the `over` in `a_over`) and use them later in the script to point back at
//! those nodes. This module provides the interned [`Id`] type used for those
//! names and for every reference-table key.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for reference identifiers.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// An interned symbolic reference id.
///
/// Comparing and hashing an `Id` never touches the underlying string, which
/// keeps the reference tables cheap no matter how long author-chosen names are.
///
/// # Examples
///
/// ```
/// use surveyor_core::identifier::Id;
///
/// let age = Id::new("age");
/// assert_eq!(age, Id::new("age"));
/// assert_eq!(age, "age");
/// assert_eq!(age.question_reference(), "q_age");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the author-facing spelling of a question reference (`q_<id>`).
    pub fn question_reference(&self) -> String {
        format!("q_{self}")
    }

    /// Returns the author-facing spelling of an answer reference (`a_<id>`).
    pub fn answer_reference(&self) -> String {
        format!("a_{self}")
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let name = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{name}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner
            .resolve(self.0)
            .is_some_and(|name| name == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("age");
        let id2 = Id::new("age");
        let id3 = Id::new("over");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "age");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("show_followup");
        assert_eq!(format!("{}", id), "show_followup");
    }

    #[test]
    fn test_reference_spelling() {
        let id = Id::new("1");
        assert_eq!(id.question_reference(), "q_1");
        assert_eq!(id.answer_reference(), "a_1");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("key1"), "value1");
        map.insert(Id::new("key2"), "value2");

        assert_eq!(map.get(&Id::new("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str_ref() {
        let id = Id::new("under");
        let name = String::from("under");

        assert!(id == name.as_str());
        assert!(id != "over");
    }
}
