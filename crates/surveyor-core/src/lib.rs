//! Surveyor Core Types and Definitions
//!
//! This crate provides the foundational types for the Surveyor questionnaire
//! language. It includes:
//!
//! - **Identifiers**: Interned symbolic reference ids ([`identifier::Id`])
//! - **Values**: Literal argument values of the language ([`value::Value`])
//! - **Semantic**: The survey node model produced by the interpreter ([`semantic`] module)

pub mod identifier;
pub mod semantic;
pub mod value;
