//! Node builders.
//!
//! Each node kind has one [`NodeBuilder`]: it declares whether the node takes
//! a body, builds the node from the [`Context`] and the statement arguments,
//! and prunes the context when the node's body closes.
//!
//! The dispatcher looks builders up through [`builder_for`], a static table
//! keyed by [`NodeKind`].

mod answer;
mod dependency;
mod group;
mod question;
mod section;
mod survey;
mod validation;

use std::str::FromStr;

use surveyor_core::{
    identifier::Id,
    value::{Value, ValueMap},
};

use crate::{
    context::Context,
    error::{Diagnostic, ErrorCode, Result},
    span::{Span, Spanned},
    verb::NodeKind,
};

/// Whether a node kind opens a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyRule {
    /// A missing body is an error
    Required,
    Optional,
    /// A body is an error
    Forbidden,
}

/// One statement as seen by a builder.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Invocation<'a> {
    pub kind: NodeKind,
    /// Base verb, e.g. `grid` or `label`
    pub base: &'a str,
    /// Symbolic reference id from the verb suffix
    pub reference: Option<&'a str>,
    pub arguments: &'a [Spanned<Value>],
    /// Verb and arguments
    pub span: Span,
}

impl Invocation<'_> {
    pub fn reference_id(&self) -> Option<Id> {
        self.reference.map(Id::new)
    }

    /// A statement that needs an enclosing node the context does not have.
    pub fn missing_parent(&self, parent: &str) -> Diagnostic {
        Diagnostic::error(format!(
            "{} must be declared inside {parent}",
            self.kind.described()
        ))
        .with_code(ErrorCode::E203)
        .with_label(self.span, "no enclosing node")
        .with_help(format!("move this statement into the body of {parent}"))
    }

    /// Arguments that do not fit the node kind.
    pub fn invalid_arguments(&self, expected: &str) -> Diagnostic {
        Diagnostic::error(format!(
            "invalid arguments for {}",
            self.kind.described()
        ))
        .with_code(ErrorCode::E204)
        .with_label(self.span, "invalid arguments")
        .with_help(format!("expected {expected}"))
    }
}

pub(crate) fn invalid_argument(span: Span, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(message)
        .with_code(ErrorCode::E204)
        .with_label(span, "invalid argument")
}

/// Builds one kind of node.
pub(crate) trait NodeBuilder {
    fn body(&self) -> BodyRule;

    /// Build the node and make it current in the context.
    fn build(&self, ctx: &mut Context, invocation: &Invocation<'_>) -> Result<()>;

    /// Restore the context when the node's body closes.
    fn prune(&self, _ctx: &mut Context) {}
}

pub(crate) fn builder_for(kind: NodeKind) -> &'static dyn NodeBuilder {
    match kind {
        NodeKind::Survey => &survey::SurveyNodeBuilder,
        NodeKind::Section => &section::SectionBuilder,
        NodeKind::Group => &group::GroupBuilder,
        NodeKind::Question => &question::QuestionBuilder,
        NodeKind::Answer => &answer::AnswerBuilder,
        NodeKind::Dependency => &dependency::DependencyBuilder,
        NodeKind::DependencyCondition => &dependency::DependencyConditionBuilder,
        NodeKind::Validation => &validation::ValidationBuilder,
        NodeKind::ValidationCondition => &validation::ValidationConditionBuilder,
    }
}

/// A keyword map argument, consumed key by key.
///
/// Keys the builder takes become typed fields; whatever remains is kept as
/// the node's attributes.
#[derive(Debug, Clone, Default)]
pub(crate) struct Keywords {
    entries: ValueMap,
    span: Span,
}

impl Keywords {
    pub fn empty(span: Span) -> Self {
        Self {
            entries: ValueMap::new(),
            span,
        }
    }

    /// Accept a map argument. `display_order` is rejected: it is always
    /// assigned from the sibling count.
    pub fn from_argument(argument: &Spanned<Value>) -> Result<Self> {
        let entries = argument
            .as_map()
            .map_err(|err| invalid_argument(argument.span(), format!("invalid keyword map: {err}")))?;

        if entries.contains_key("display_order") {
            return Err(invalid_argument(
                argument.span(),
                "`display_order` cannot be set",
            )
            .with_help("display order is assigned from the declaration order"));
        }

        Ok(Self {
            entries: entries.clone(),
            span: argument.span(),
        })
    }

    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Take a string or symbol entry.
    pub fn take_name(&mut self, key: &str) -> Result<Option<String>> {
        match self.take(key) {
            None | Some(Value::Nil) => Ok(None),
            Some(value) => value
                .as_name()
                .map(|name| Some(name.to_string()))
                .map_err(|err| invalid_argument(self.span, format!("invalid `{key}`: {err}"))),
        }
    }

    /// Take an entry naming one of the variants of `T`.
    pub fn take_parsed<T>(&mut self, key: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = &'static str>,
    {
        let Some(name) = self.take_name(key)? else {
            return Ok(None);
        };
        name.parse()
            .map(Some)
            .map_err(|err| invalid_argument(self.span, format!("{err}: `{name}`")))
    }

    pub fn take_bool(&mut self, key: &str) -> Result<Option<bool>> {
        match self.take(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .map_err(|err| invalid_argument(self.span, format!("invalid `{key}`: {err}"))),
        }
    }

    pub fn into_attributes(self) -> ValueMap {
        self.entries
    }
}

/// Title or text given as a positional argument. `nil` means the default.
fn text_value(argument: &Spanned<Value>) -> Result<Option<String>> {
    match argument.inner() {
        Value::Nil => Ok(None),
        value => value
            .as_name()
            .map(|text| Some(text.to_string()))
            .map_err(|err| invalid_argument(argument.span(), format!("invalid text: {err}"))),
    }
}

/// Split `[text] [keywords]` arguments.
///
/// The keyword entry named `text_key` overrides the positional text.
pub(crate) fn text_and_keywords(
    invocation: &Invocation<'_>,
    text_key: &str,
    default: &str,
) -> Result<(String, Keywords)> {
    let (text, map) = match invocation.arguments {
        [] => (None, None),
        [map] if map.is_map() => (None, Some(map)),
        [text] => (Some(text), None),
        [text, map] if map.is_map() => (Some(text), Some(map)),
        _ => return Err(invocation.invalid_arguments("a text and an optional keyword map")),
    };

    let text = match text {
        Some(argument) => text_value(argument)?,
        None => None,
    };
    let mut keywords = match map {
        Some(map) => Keywords::from_argument(map)?,
        None => Keywords::empty(invocation.span),
    };

    let text = keywords
        .take_name(text_key)?
        .or(text)
        .unwrap_or_else(|| default.to_string());
    Ok((text, keywords))
}

/// Arguments made only of an optional keyword map.
pub(crate) fn keywords_only(invocation: &Invocation<'_>) -> Result<Keywords> {
    match invocation.arguments {
        [] => Ok(Keywords::empty(invocation.span)),
        [map] if map.is_map() => Keywords::from_argument(map),
        _ => Err(invocation.invalid_arguments("an optional keyword map")),
    }
}

/// A reference argument such as `:q_age` or `"a_over"`, without its prefix.
///
/// An empty name means no reference.
pub(crate) fn reference_name(value: &Value, prefix: &str, span: Span) -> Result<Option<Id>> {
    if value.is_nil() {
        return Ok(None);
    }
    let name = value
        .as_name()
        .map_err(|err| invalid_argument(span, format!("invalid reference: {err}")))?;
    let name = name.strip_prefix(prefix).unwrap_or(name);
    Ok((!name.is_empty()).then(|| Id::new(name)))
}
