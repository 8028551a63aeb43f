//! Formula evaluator
//!
//! Evaluates formula text against a snapshot of header and row values.

use ahash::AHashMap;

use crate::dependency::FieldRef;
use crate::lexer::tokenize_with;
use crate::parser::parse;

/// Numeric values by field id
pub type ValueMap = AHashMap<String, f64>;

/// Values visible to a formula: header scope and row scope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulaScope {
    pub header_values: ValueMap,
    pub row_values: ValueMap,
}

impl FormulaScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope with header values only
    pub fn with_header_values(header_values: ValueMap) -> Self {
        Self {
            header_values,
            row_values: ValueMap::new(),
        }
    }

    /// Add a header value
    pub fn header(mut self, id: impl Into<String>, value: f64) -> Self {
        self.header_values.insert(id.into(), value);
        self
    }

    /// Add a row value
    pub fn row(mut self, id: impl Into<String>, value: f64) -> Self {
        self.row_values.insert(id.into(), value);
        self
    }

    /// Current value of a reference, if any
    pub fn get(&self, field_ref: &FieldRef) -> Option<f64> {
        match field_ref {
            FieldRef::Row(id) => self.row_values.get(id).copied(),
            FieldRef::Header(id) => self.header_values.get(id).copied(),
        }
    }
}

/// Evaluate a formula
///
/// Returns `None` when the result is unknown: a referenced field has no
/// finite value, the formula is malformed, or the result is not finite
/// (division by zero, overflow). Never panics.
///
/// # Example
/// ```rust
/// use qualdoc_formula::{evaluate_formula, FormulaScope};
///
/// let scope = FormulaScope::new().header("b", 2.0).row("a", 3.0);
/// assert_eq!(evaluate_formula("{a}+{header.b}", &scope), Some(5.0));
/// assert_eq!(evaluate_formula("{a}/0", &scope), None);
/// ```
pub fn evaluate_formula(formula: &str, scope: &FormulaScope) -> Option<f64> {
    // A missing dependency surfaces here too; nothing to compute yet
    let tokens = tokenize_with(formula, |field_ref| scope.get(field_ref)).ok()?;
    parse(&tokens).filter(|n| n.is_finite())
}
