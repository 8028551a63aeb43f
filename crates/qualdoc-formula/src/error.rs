//! Formula error types

use std::fmt;

use thiserror::Error;

use crate::dependency::FieldRef;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Namespace a field reference resolves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldScope {
    /// `{id}`
    Row,
    /// `{header.id}`
    Header,
}

impl fmt::Display for FieldScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldScope::Row => f.write_str("row"),
            FieldScope::Header => f.write_str("header"),
        }
    }
}

/// Errors that can occur while tokenizing, parsing or validating a formula
///
/// [`evaluate_formula`](crate::evaluate_formula) never surfaces these: a
/// missing value, a malformed formula and a non-finite result all come back
/// as an unresolved (`None`) result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Character outside the formula language
    #[error("Unexpected character '{ch}' at position {position}")]
    Tokenize { ch: char, position: usize },

    /// Malformed expression
    #[error("Parse error: {0}")]
    Parse(String),

    /// Referenced field has no (finite) value yet
    #[error("no value for {0}")]
    MissingValue(FieldRef),

    /// Reference to a field that does not exist in its scope
    #[error("unknown {scope} field: {id}")]
    UnknownField { scope: FieldScope, id: String },

    /// Dry run of the formula failed to tokenize or parse
    #[error("invalid formula syntax")]
    InvalidSyntax,
}
