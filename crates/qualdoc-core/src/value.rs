//! Field value types

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::field::{FieldDefinition, FieldKind};

/// Outcome of a pass/fail check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PassFail {
    Pass,
    Fail,
}

impl PassFail {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassFail::Pass => "pass",
            PassFail::Fail => "fail",
        }
    }
}

/// Parse the stored text form ("pass" / "fail", case-insensitive)
impl FromStr for PassFail {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" => Ok(PassFail::Pass),
            "fail" => Ok(PassFail::Fail),
            _ => Err(Error::other(format!("Invalid pass/fail value: '{}'", s))),
        }
    }
}

impl fmt::Display for PassFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The populated slot of a field value
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "value", rename_all = "snake_case")
)]
pub enum FieldSlot {
    /// Nothing entered yet (or calculated but unresolved)
    #[default]
    Empty,
    Text(String),
    Numeric(f64),
    Boolean(bool),
    PassFail(PassFail),
    /// Result written by formula resolution
    Calculated(f64),
}

impl FieldSlot {
    /// Short name of the slot, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldSlot::Empty => "empty",
            FieldSlot::Text(_) => "text",
            FieldSlot::Numeric(_) => "numeric",
            FieldSlot::Boolean(_) => "boolean",
            FieldSlot::PassFail(_) => "pass_fail",
            FieldSlot::Calculated(_) => "calculated",
        }
    }

    /// Check whether this slot may be stored in a field of `kind`
    ///
    /// An empty slot fits every kind.
    pub fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldSlot::Empty, _)
                | (FieldSlot::Text(_), FieldKind::Text | FieldKind::Photo)
                | (FieldSlot::Numeric(_), FieldKind::Numeric)
                | (FieldSlot::Boolean(_), FieldKind::Boolean)
                | (FieldSlot::PassFail(_), FieldKind::PassFail)
                | (FieldSlot::Calculated(_), FieldKind::Calculated)
        )
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldSlot::Empty)
    }
}

impl From<f64> for FieldSlot {
    fn from(n: f64) -> Self {
        FieldSlot::Numeric(n)
    }
}

impl From<&str> for FieldSlot {
    fn from(s: &str) -> Self {
        FieldSlot::Text(s.to_string())
    }
}

impl From<String> for FieldSlot {
    fn from(s: String) -> Self {
        FieldSlot::Text(s)
    }
}

impl From<bool> for FieldSlot {
    fn from(b: bool) -> Self {
        FieldSlot::Boolean(b)
    }
}

impl From<PassFail> for FieldSlot {
    fn from(p: PassFail) -> Self {
        FieldSlot::PassFail(p)
    }
}

/// The value of one field within a document (or one row of it)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldValue {
    pub field_id: String,
    pub kind: FieldKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: FieldSlot,
}

impl FieldValue {
    /// Create an empty value for a field definition
    pub fn empty(def: &FieldDefinition) -> Self {
        Self {
            field_id: def.id.clone(),
            kind: def.kind,
            slot: FieldSlot::Empty,
        }
    }

    /// Create a value for a field definition, populated with its default
    pub fn for_definition(def: &FieldDefinition) -> Self {
        let mut value = Self::empty(def);
        if let Some(default) = &def.default_value {
            if default.fits(def.kind) && !def.is_calculated() {
                value.slot = default.clone();
            }
        }
        value
    }

    /// Numeric view of the value, for formula lookups
    ///
    /// Only numeric input and resolved calculated results have one.
    pub fn as_number(&self) -> Option<f64> {
        match self.slot {
            FieldSlot::Numeric(n) | FieldSlot::Calculated(n) => Some(n),
            _ => None,
        }
    }

    /// Resolved result of a calculated field
    pub fn calculated(&self) -> Option<f64> {
        match self.slot {
            FieldSlot::Calculated(n) => Some(n),
            _ => None,
        }
    }

    /// Store user input
    ///
    /// Calculated fields are read-only here; their slot belongs to
    /// formula resolution.
    pub fn set_input(&mut self, slot: FieldSlot) -> Result<()> {
        if self.kind == FieldKind::Calculated {
            return Err(Error::CalculatedFieldIsReadOnly(self.field_id.clone()));
        }
        if !slot.fits(self.kind) {
            return Err(Error::ValueKindMismatch {
                field: self.field_id.clone(),
                expected: self.kind,
                actual: slot.type_name(),
            });
        }
        self.slot = slot;
        Ok(())
    }

    /// Store (or clear) a resolved formula result
    ///
    /// Intended for the resolution engine only. Ignored for fields that are
    /// not calculated.
    pub fn set_calculated(&mut self, result: Option<f64>) {
        if self.kind != FieldKind::Calculated {
            return;
        }
        self.slot = match result {
            Some(n) => FieldSlot::Calculated(n),
            None => FieldSlot::Empty,
        };
    }
}

/// An ordered set of field values (a document header or a single row)
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FieldValues(Vec<FieldValue>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by field id
    pub fn get(&self, field_id: &str) -> Option<&FieldValue> {
        self.0.iter().find(|v| v.field_id == field_id)
    }

    /// Get a mutable value by field id
    pub fn get_mut(&mut self, field_id: &str) -> Option<&mut FieldValue> {
        self.0.iter_mut().find(|v| v.field_id == field_id)
    }

    pub fn push(&mut self, value: FieldValue) {
        self.0.push(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldValue> {
        self.0.iter()
    }

    /// Iterate `(field_id, number)` for every value with a numeric view
    pub fn numbers(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0
            .iter()
            .filter_map(|v| v.as_number().map(|n| (v.field_id.as_str(), n)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<FieldValue> for FieldValues {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_fits_kind() {
        assert!(FieldSlot::Empty.fits(FieldKind::Calculated));
        assert!(FieldSlot::Numeric(1.0).fits(FieldKind::Numeric));
        assert!(FieldSlot::Text("a.jpg".into()).fits(FieldKind::Photo));
        assert!(!FieldSlot::Numeric(1.0).fits(FieldKind::Calculated));
        assert!(!FieldSlot::Boolean(true).fits(FieldKind::PassFail));
    }

    #[test]
    fn test_set_input() {
        let def = FieldDefinition::numeric("gross", "Gross");
        let mut value = FieldValue::empty(&def);

        value.set_input(FieldSlot::Numeric(12.5)).unwrap();
        assert_eq!(value.as_number(), Some(12.5));

        let err = value.set_input("heavy".into()).unwrap_err();
        assert!(matches!(err, Error::ValueKindMismatch { .. }));
        assert_eq!(value.as_number(), Some(12.5));
    }

    #[test]
    fn test_calculated_is_read_only() {
        let def = FieldDefinition::calculated("net", "Net", "{gross}-{tare}");
        let mut value = FieldValue::empty(&def);

        let err = value.set_input(FieldSlot::Numeric(3.0)).unwrap_err();
        assert_eq!(err, Error::CalculatedFieldIsReadOnly("net".into()));

        value.set_calculated(Some(7.0));
        assert_eq!(value.calculated(), Some(7.0));
        assert_eq!(value.as_number(), Some(7.0));

        value.set_calculated(None);
        assert_eq!(value.slot, FieldSlot::Empty);
    }

    #[test]
    fn test_set_calculated_ignores_input_fields() {
        let def = FieldDefinition::numeric("gross", "Gross");
        let mut value = FieldValue::empty(&def);
        value.set_calculated(Some(1.0));
        assert_eq!(value.slot, FieldSlot::Empty);
    }

    #[test]
    fn test_default_value() {
        let def = FieldDefinition::new("ok", "OK", FieldKind::PassFail)
            .with_default(PassFail::Pass.into());
        let value = FieldValue::for_definition(&def);
        assert_eq!(value.slot, FieldSlot::PassFail(PassFail::Pass));
        assert_eq!(value.as_number(), None);
    }

    #[test]
    fn test_numbers() {
        let values: FieldValues = vec![
            FieldValue {
                field_id: "a".into(),
                kind: FieldKind::Numeric,
                slot: FieldSlot::Numeric(1.0),
            },
            FieldValue {
                field_id: "b".into(),
                kind: FieldKind::Text,
                slot: FieldSlot::Text("x".into()),
            },
            FieldValue {
                field_id: "c".into(),
                kind: FieldKind::Calculated,
                slot: FieldSlot::Calculated(2.0),
            },
        ]
        .into_iter()
        .collect();

        let numbers: Vec<_> = values.numbers().collect();
        assert_eq!(numbers, vec![("a", 1.0), ("c", 2.0)]);
    }

    #[test]
    fn test_pass_fail_text() {
        assert_eq!("PASS".parse::<PassFail>(), Ok(PassFail::Pass));
        assert_eq!(" fail".parse::<PassFail>(), Ok(PassFail::Fail));
        assert_eq!(
            "maybe".parse::<PassFail>(),
            Err(Error::Other("Invalid pass/fail value: 'maybe'".into()))
        );
        assert_eq!(PassFail::Fail.to_string(), "fail");
    }
}
