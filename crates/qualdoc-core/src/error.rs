//! Error types for qualdoc-core

use thiserror::Error;

use crate::field::FieldKind;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in qualdoc-core
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Two field definitions share an id
    #[error("Duplicate field id: {0}")]
    DuplicateFieldId(String),

    /// Field id is not a valid identifier
    #[error("Invalid field id: '{0}'")]
    InvalidFieldId(String),

    /// Calculated field without a formula
    #[error("Calculated field '{0}' has no formula")]
    MissingFormula(String),

    /// Formula attached to a field that is not calculated
    #[error("Field '{0}' is not calculated but has a formula")]
    UnexpectedFormula(String),

    /// Field minimum is greater than its maximum
    #[error("Field '{field}' has min {min} greater than max {max}")]
    InvalidBounds { field: String, min: f64, max: f64 },

    /// Template minimum row count exceeds its maximum
    #[error("Template row bounds are invalid: min {min} greater than max {max}")]
    InvalidRowBounds { min: usize, max: usize },

    /// Default value does not fit the field kind
    #[error("Default value for field '{field}' does not match kind {kind}")]
    DefaultKindMismatch { field: String, kind: FieldKind },

    /// Document row count outside the template's bounds
    #[error("Row count {count} out of bounds (min: {min}, max: {max:?})")]
    RowCountOutOfBounds {
        count: usize,
        min: usize,
        max: Option<usize>,
    },

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (count: {1})")]
    RowOutOfBounds(usize, usize),

    /// Field not found in the document or template
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Attempt to write user input into a calculated field
    #[error("Field '{0}' is calculated and cannot be set directly")]
    CalculatedFieldIsReadOnly(String),

    /// Value slot does not match the field kind
    #[error("Invalid value for field '{field}': expected {expected}, got {actual}")]
    ValueKindMismatch {
        field: String,
        expected: FieldKind,
        actual: &'static str,
    },

    /// Document status cannot advance further
    #[error("Cannot advance document from status {0}")]
    InvalidTransition(&'static str),

    /// A calculated field's formula failed validation
    #[error("Invalid formula for field '{field}': {reason}")]
    InvalidFormula { field: String, reason: String },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
