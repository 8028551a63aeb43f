//! # qualdoc
//!
//! Formula validation and calculated-field resolution for quality document
//! templates.
//!
//! A template is an ordered list of typed fields, each either a header field
//! (one value per document) or a row field (one value per row). Calculated
//! fields carry an arithmetic formula over other fields:
//!
//! - `{id}` refers to a field in the same row
//! - `{header.id}` refers to a header field
//! - `+ - * /`, parentheses and numeric literals
//!
//! ## Features
//!
//! - Template validation: structure, references and formula syntax
//! - Single-formula evaluation that never panics
//! - Whole-document resolution of every calculated field
//! - Optional serde support (`serde` feature)
//!
//! ## Example
//!
//! ```rust
//! use qualdoc::prelude::*;
//!
//! let template = Template::new("Fill check")
//!     .with_field(FieldDefinition::numeric("target", "Target").in_header().with_unit("g"))
//!     .with_field(FieldDefinition::numeric("weight", "Weight").with_unit("g"))
//!     .with_field(FieldDefinition::calculated(
//!         "deviation",
//!         "Deviation %",
//!         "({weight}-{header.target})/{header.target}*100",
//!     ));
//! validate_template(&template).unwrap();
//!
//! let mut doc = DocumentInstance::new(&template, 2).unwrap();
//! doc.set_header_input("target", 500.0).unwrap();
//! doc.set_row_input(0, "weight", 505.0).unwrap();
//!
//! let stats = doc.resolve(&template);
//! assert_eq!(doc.row_value(0, "deviation").unwrap().calculated(), Some(1.0));
//! // Row 1 has no weight yet
//! assert_eq!(doc.row_value(1, "deviation").unwrap().calculated(), None);
//! assert!(!stats.is_complete());
//! ```

pub mod prelude;
pub mod resolution;
pub mod validation;

// Re-export resolution types
pub use resolution::{
    resolve_calculated_fields, DocumentResolutionExt, ResolutionOptions, ResolutionStats,
    DEFAULT_ROW_PASSES,
};
pub use validation::validate_template;

// Re-export core types
pub use qualdoc_core::{
    is_valid_field_id,
    // Documents
    DocumentInstance,
    DocumentStatus,
    // Error types
    Error,
    // Fields
    FieldContext,
    FieldDefinition,
    FieldKind,
    FieldSlot,
    FieldStage,
    FieldValue,
    FieldValues,
    PassFail,
    Result,
    Template,
};

// Re-export formula types
pub use qualdoc_formula::{
    check_formula, evaluate_formula, extract_field_dependencies, extract_field_refs,
    validate_formula, FieldDependencies, FieldRef, FieldScope, FormulaError, FormulaResult,
    FormulaScope, Validation, ValueMap,
};
