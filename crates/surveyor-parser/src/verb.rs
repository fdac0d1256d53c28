//! Verb normalisation.
//!
//! A statement verb is a base verb optionally followed by `_` and a symbolic
//! reference id: `q_age` is the question verb `q` with reference `age`, and
//! `q_show_followup` has reference `show_followup`. The base verb maps onto a
//! [`NodeKind`] through a closed table.

use std::fmt;

/// The kind of node a statement builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NodeKind {
    Survey,
    Section,
    Group,
    Question,
    Answer,
    Dependency,
    DependencyCondition,
    Validation,
    ValidationCondition,
}

impl NodeKind {
    /// The canonical name, as written in the trace channel.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Survey => "survey",
            Self::Section => "survey_section",
            Self::Group => "question_group",
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Dependency => "dependency",
            Self::DependencyCondition => "dependency_condition",
            Self::Validation => "validation",
            Self::ValidationCondition => "validation_condition",
        }
    }

    /// Human readable name with its indefinite article, for diagnostics.
    pub fn described(self) -> &'static str {
        match self {
            Self::Survey => "a survey",
            Self::Section => "a survey section",
            Self::Group => "a question group",
            Self::Question => "a question",
            Self::Answer => "an answer",
            Self::Dependency => "a dependency",
            Self::DependencyCondition => "a dependency condition",
            Self::Validation => "a validation",
            Self::ValidationCondition => "a validation condition",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Split a verb token at its first `_` into base verb and reference id.
///
/// An empty reference (`q_`) counts as no reference.
pub(crate) fn split_verb(token: &str) -> (&str, Option<&str>) {
    match token.split_once('_') {
        Some((base, reference)) if !reference.is_empty() => (base, Some(reference)),
        Some((base, _)) => (base, None),
        None => (token, None),
    }
}

/// Map a base verb onto its node kind.
///
/// `c` and `condition` build a validation condition while a validation is
/// open and a dependency condition otherwise.
pub(crate) fn classify(base: &str, validation_open: bool) -> Option<NodeKind> {
    let kind = match base {
        "survey" => NodeKind::Survey,
        "section" => NodeKind::Section,
        "g" | "group" | "grid" | "repeater" => NodeKind::Group,
        "q" | "question" | "label" | "image" => NodeKind::Question,
        "a" | "answer" => NodeKind::Answer,
        "d" | "dependency" => NodeKind::Dependency,
        "c" | "condition" if validation_open => NodeKind::ValidationCondition,
        "c" | "condition" => NodeKind::DependencyCondition,
        "v" | "validation" => NodeKind::Validation,
        "dc" | "dcondition" => NodeKind::DependencyCondition,
        "vc" | "vcondition" => NodeKind::ValidationCondition,
        _ => return None,
    };
    Some(kind)
}

/// The trace entry for a statement: `question_age`, `answer`, ...
pub(crate) fn trace_name(kind: NodeKind, reference: Option<&str>) -> String {
    match reference {
        Some(reference) => format!("{kind}_{reference}"),
        None => kind.canonical_name().to_string(),
    }
}
