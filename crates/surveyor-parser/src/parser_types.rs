//! Parser AST types.
//!
//! A survey script is a list of [`Statement`]s. Each statement is a verb
//! (`q_age`, `section`, `dc_1`, ...), its arguments, and an optional nested
//! body of further statements. The parser does not know what verbs mean; the
//! dispatcher gives them meaning.

use surveyor_core::value::Value;

use crate::span::Spanned;

/// One `verb arguments body` statement.
///
/// Trailing keyword pairs (`pick: :one`, `:pick => :one`) are gathered into a
/// single [`Value::Map`] appended after the positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'src> {
    pub verb: Spanned<&'src str>,
    pub arguments: Vec<Spanned<Value>>,
    pub body: Option<Spanned<Vec<Statement<'src>>>>,
}
