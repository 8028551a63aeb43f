//! # qualdoc-core
//!
//! Core data structures for qualdoc quality document templates.
//!
//! This crate provides the fundamental types used throughout qualdoc:
//! - [`FieldDefinition`] - A typed slot in a template, header or row scoped
//! - [`Template`] - The ordered field list plus row bounds
//! - [`FieldValue`] and [`FieldSlot`] - The data stored for a field
//! - [`DocumentInstance`] - One filled-in copy of a template
//!
//! ## Example
//!
//! ```rust
//! use qualdoc_core::{DocumentInstance, FieldDefinition, Template};
//!
//! let template = Template::new("Weighing")
//!     .with_field(FieldDefinition::numeric("tare", "Tare").in_header())
//!     .with_field(FieldDefinition::numeric("gross", "Gross"))
//!     .with_field(FieldDefinition::calculated("net", "Net", "{gross}-{header.tare}"));
//! template.check_structure().unwrap();
//!
//! let mut doc = DocumentInstance::new(&template, 2).unwrap();
//! doc.set_header_input("tare", 12.0).unwrap();
//! doc.set_row_input(0, "gross", 80.0).unwrap();
//! ```

pub mod document;
pub mod error;
pub mod field;
pub mod template;
pub mod value;

// Re-exports for convenience
pub use document::{DocumentInstance, DocumentStatus};
pub use error::{Error, Result};
pub use field::{is_valid_field_id, FieldContext, FieldDefinition, FieldKind, FieldStage};
pub use template::Template;
pub use value::{FieldSlot, FieldValue, FieldValues, PassFail};
