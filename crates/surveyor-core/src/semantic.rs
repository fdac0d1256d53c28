//! Survey node model.
//!
//! This module contains the in-memory representation of a survey after a
//! script has been interpreted. Ownership is strictly tree-shaped; the few
//! links that cross the tree (a question's group, a dependency condition's
//! question and answer, a question's correct answer) are typed positional ids
//! resolved through [`Survey`].
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ lexer
//! Tokens
//!     ↓ parser
//! Statements (parser_types) - verbs, arguments and bodies with spans
//!     ↓ dispatcher + builders
//! Survey graph (these types) - linked sections, questions and answers
//!     ↓ store
//! Persisted survey
//! ```
//!
//! # Organization
//!
//! - [`survey`] - [`Survey`], [`SurveySection`], [`QuestionGroup`] and the link ids
//! - [`question`] - [`Question`], [`Answer`] and their display enumerations
//! - [`rule`] - [`Dependency`], [`Validation`] and their conditions

pub mod question;
pub mod rule;
pub mod survey;

pub use question::*;
pub use rule::*;
pub use survey::*;
