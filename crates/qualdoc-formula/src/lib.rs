//! # qualdoc-formula
//!
//! Formula engine for qualdoc calculated fields.
//!
//! This crate provides:
//! - Field reference extraction (`{id}` and `{header.id}`)
//! - Tokenizing and recursive-descent evaluation of `+ - * /` arithmetic
//! - Template-time validation with a placeholder dry run
//!
//! The formula language is closed: numbers, the four operators,
//! parentheses and field references. Nothing is ever handed to a general
//! expression evaluator.
//!
//! ## Example
//!
//! ```rust
//! use qualdoc_formula::{evaluate_formula, validate_formula, FormulaScope};
//!
//! let formula = "({gross}-{header.tare})/{gross}*100";
//! assert!(validate_formula(formula, &["gross"], &["tare"]).valid);
//!
//! let scope = FormulaScope::new().header("tare", 20.0).row("gross", 80.0);
//! assert_eq!(evaluate_formula(formula, &scope), Some(75.0));
//! ```

pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod validator;

pub use dependency::{extract_field_dependencies, extract_field_refs, FieldDependencies, FieldRef};
pub use error::{FieldScope, FormulaError, FormulaResult};
pub use evaluator::{evaluate_formula, FormulaScope, ValueMap};
pub use validator::{check_formula, validate_formula, Validation};
