//! Field definitions
//!
//! A field definition is a named, typed slot in a [`Template`](crate::Template).
//! Header fields appear once per document; row fields repeat for every row.
//!
//! # Example
//!
//! ```rust
//! use qualdoc_core::{FieldDefinition, FieldKind};
//!
//! let gross = FieldDefinition::numeric("gross", "Gross weight").with_unit("kg");
//! let net = FieldDefinition::calculated("net", "Net weight", "{gross}-{header.tare}")
//!     .with_decimal_places(2);
//!
//! assert_eq!(gross.kind, FieldKind::Numeric);
//! assert_eq!(net.formula.as_deref(), Some("{gross}-{header.tare}"));
//! ```

use std::fmt;

use crate::value::FieldSlot;

/// Which part of the document a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldContext {
    /// Document-level field, a single instance
    Header,
    /// Repeated once per row
    #[default]
    Row,
}

/// The kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    Text,
    Numeric,
    Boolean,
    PassFail,
    Calculated,
    /// Reference to an uploaded photo, stored as text
    Photo,
}

impl FieldKind {
    /// Name used in serialized templates
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Numeric => "numeric",
            FieldKind::Boolean => "boolean",
            FieldKind::PassFail => "pass_fail",
            FieldKind::Calculated => "calculated",
            FieldKind::Photo => "photo",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow participant allowed to fill a field
///
/// The engine never looks at this; callers use it to decide when a document
/// is ready to be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldStage {
    Supervisor,
    #[default]
    Worker,
}

/// A field definition within a template
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDefinition {
    /// Stable id, unique within the template across both contexts
    pub id: String,
    /// Display label
    pub label: String,
    /// Header or row
    #[cfg_attr(feature = "serde", serde(default))]
    pub context: FieldContext,
    /// Value kind
    pub kind: FieldKind,
    /// Display unit (numeric/calculated only)
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub unit: Option<String>,
    /// Decimal places hint for presentation
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub decimal_places: Option<u8>,
    /// Lower bound hint
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub min: Option<f64>,
    /// Upper bound hint
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub max: Option<f64>,
    /// Formula text (calculated only)
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub formula: Option<String>,
    /// Value a new document starts with
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub default_value: Option<FieldSlot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stage: FieldStage,
}

impl FieldDefinition {
    /// Create a row field of the given kind
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            context: FieldContext::Row,
            kind,
            unit: None,
            decimal_places: None,
            min: None,
            max: None,
            formula: None,
            default_value: None,
            required: false,
            stage: FieldStage::default(),
        }
    }

    /// Create a numeric row field
    pub fn numeric(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldKind::Numeric)
    }

    /// Create a text row field
    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, FieldKind::Text)
    }

    /// Create a calculated row field
    pub fn calculated(
        id: impl Into<String>,
        label: impl Into<String>,
        formula: impl Into<String>,
    ) -> Self {
        let mut field = Self::new(id, label, FieldKind::Calculated);
        field.formula = Some(formula.into());
        field
    }

    /// Move this field to the document header
    pub fn in_header(mut self) -> Self {
        self.context = FieldContext::Header;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_decimal_places(mut self, places: u8) -> Self {
        self.decimal_places = Some(places);
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_default(mut self, value: FieldSlot) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn filled_by(mut self, stage: FieldStage) -> Self {
        self.stage = stage;
        self
    }

    /// Check if this is a calculated field
    pub fn is_calculated(&self) -> bool {
        self.kind == FieldKind::Calculated
    }

    pub fn is_header(&self) -> bool {
        self.context == FieldContext::Header
    }
}

/// Check that `id` is usable in a formula reference (`[A-Za-z_][A-Za-z0-9_]*`)
pub fn is_valid_field_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_field_ids() {
        assert!(is_valid_field_id("gross"));
        assert!(is_valid_field_id("_tmp"));
        assert!(is_valid_field_id("weight_2"));

        assert!(!is_valid_field_id(""));
        assert!(!is_valid_field_id("2nd"));
        assert!(!is_valid_field_id("header.tare"));
        assert!(!is_valid_field_id("net weight"));
    }

    #[test]
    fn test_builder() {
        let field = FieldDefinition::numeric("tare", "Tare")
            .in_header()
            .with_unit("kg")
            .with_bounds(Some(0.0), None)
            .required()
            .filled_by(FieldStage::Supervisor);

        assert!(field.is_header());
        assert!(!field.is_calculated());
        assert_eq!(field.unit.as_deref(), Some("kg"));
        assert_eq!(field.min, Some(0.0));
        assert!(field.required);
        assert_eq!(field.stage, FieldStage::Supervisor);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FieldKind::PassFail.to_string(), "pass_fail");
    }
}
