//! Template-time formula validation
//!
//! Runs before any document data exists: every reference must name a field
//! in the right scope, and the formula must parse once its references are
//! replaced with a placeholder.

use crate::dependency::{extract_field_refs, FieldRef};
use crate::error::{FormulaError, FormulaResult};
use crate::lexer::tokenize_with;
use crate::parser::parse_tokens;

/// Value every reference takes during the dry run
pub const PLACEHOLDER_VALUE: f64 = 1.0;

/// Outcome of [`validate_formula`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub error: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(reason.into()),
        }
    }
}

impl From<FormulaResult<()>> for Validation {
    fn from(result: FormulaResult<()>) -> Self {
        match result {
            Ok(()) => Validation::ok(),
            Err(e) => Validation::invalid(e.to_string()),
        }
    }
}

/// Validate a formula against the ids referenceable from each scope
///
/// # Example
/// ```rust
/// use qualdoc_formula::validate_formula;
///
/// assert!(validate_formula("{x}+1", &["x"], &[]).valid);
///
/// let result = validate_formula("{y}+1", &["x"], &[]);
/// assert!(!result.valid);
/// assert_eq!(result.error.as_deref(), Some("unknown row field: y"));
/// ```
pub fn validate_formula(
    formula: &str,
    available_row_ids: &[&str],
    available_header_ids: &[&str],
) -> Validation {
    check_formula(formula, available_row_ids, available_header_ids).into()
}

/// Like [`validate_formula`], returning the first problem as an error
pub fn check_formula(
    formula: &str,
    available_row_ids: &[&str],
    available_header_ids: &[&str],
) -> FormulaResult<()> {
    for field_ref in extract_field_refs(formula) {
        let available = match &field_ref {
            FieldRef::Row(id) => available_row_ids.contains(&id.as_str()),
            FieldRef::Header(id) => available_header_ids.contains(&id.as_str()),
        };
        if !available {
            tracing::debug!(formula, reference = %field_ref, "formula references unknown field");
            return Err(FormulaError::UnknownField {
                scope: field_ref.scope(),
                id: field_ref.id().to_string(),
            });
        }
    }

    // Dry run with placeholders; only the shape matters here, so a
    // non-finite placeholder result (e.g. `{a}/({b}-1)`) still passes.
    let outcome = tokenize_with(formula, |_| Some(PLACEHOLDER_VALUE))
        .and_then(|tokens| parse_tokens(&tokens));
    if let Err(e) = outcome {
        tracing::debug!(formula, error = %e, "formula failed dry run");
        return Err(FormulaError::InvalidSyntax);
    }

    Ok(())
}
