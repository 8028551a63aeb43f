//! Prelude module - common imports for qualdoc users
//!
//! ```rust
//! use qualdoc::prelude::*;
//! ```

pub use crate::{
    // Documents
    DocumentInstance,
    // Extension traits
    DocumentResolutionExt,
    DocumentStatus,
    // Error types
    Error,
    // Fields
    FieldDefinition,
    FieldKind,
    FieldSlot,
    // Formula types
    FormulaScope,
    PassFail,
    // Resolution types
    ResolutionOptions,
    ResolutionStats,
    Result,
    Template,
    Validation,

    // Functions
    evaluate_formula,
    resolve_calculated_fields,
    validate_formula,
    validate_template,
};
