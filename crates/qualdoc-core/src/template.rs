//! Quality document templates

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::field::{is_valid_field_id, FieldDefinition};

/// A quality document template
///
/// Field order is significant: calculated fields are resolved in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Template {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    /// Minimum number of rows a document must have
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_rows: usize,
    /// Maximum number of rows (unbounded if `None`)
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub max_rows: Option<usize>,
}

impl Template {
    /// Create an empty template
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            min_rows: 0,
            max_rows: None,
        }
    }

    /// Append a field definition
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_row_bounds(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_rows = min;
        self.max_rows = max;
        self
    }

    /// Header fields in declaration order
    pub fn header_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.is_header())
    }

    /// Row fields in declaration order
    pub fn row_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| !f.is_header())
    }

    /// Look up a field definition by id
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Ids referenceable as `{header.id}`
    pub fn header_field_ids(&self) -> Vec<&str> {
        self.header_fields().map(|f| f.id.as_str()).collect()
    }

    /// Ids referenceable as `{id}`
    pub fn row_field_ids(&self) -> Vec<&str> {
        self.row_fields().map(|f| f.id.as_str()).collect()
    }

    /// Check whether `count` rows is allowed
    pub fn accepts_row_count(&self, count: usize) -> bool {
        count >= self.min_rows && self.max_rows.map_or(true, |max| count <= max)
    }

    /// Check the template's structural invariants
    ///
    /// Formulas are not parsed here; see `qualdoc::validate_template` for the
    /// full check including formula references.
    pub fn check_structure(&self) -> Result<()> {
        if let Some(max) = self.max_rows {
            if self.min_rows > max {
                return Err(Error::InvalidRowBounds {
                    min: self.min_rows,
                    max,
                });
            }
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !is_valid_field_id(&field.id) {
                return Err(Error::InvalidFieldId(field.id.clone()));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(Error::DuplicateFieldId(field.id.clone()));
            }

            match (field.is_calculated(), &field.formula) {
                (true, None) => return Err(Error::MissingFormula(field.id.clone())),
                (true, Some(f)) if f.trim().is_empty() => {
                    return Err(Error::MissingFormula(field.id.clone()))
                }
                (false, Some(_)) => return Err(Error::UnexpectedFormula(field.id.clone())),
                _ => {}
            }

            if let (Some(min), Some(max)) = (field.min, field.max) {
                if min > max {
                    return Err(Error::InvalidBounds {
                        field: field.id.clone(),
                        min,
                        max,
                    });
                }
            }

            if let Some(default) = &field.default_value {
                if field.is_calculated() || !default.fits(field.kind) {
                    return Err(Error::DefaultKindMismatch {
                        field: field.id.clone(),
                        kind: field.kind,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use crate::value::FieldSlot;

    fn weighing() -> Template {
        Template::new("Weighing")
            .with_field(FieldDefinition::numeric("tare", "Tare").in_header())
            .with_field(FieldDefinition::numeric("gross", "Gross"))
            .with_field(FieldDefinition::calculated(
                "net",
                "Net",
                "{gross}-{header.tare}",
            ))
            .with_row_bounds(1, Some(10))
    }

    #[test]
    fn test_scoped_ids() {
        let template = weighing();
        assert_eq!(template.header_field_ids(), vec!["tare"]);
        assert_eq!(template.row_field_ids(), vec!["gross", "net"]);
        assert!(template.field("net").unwrap().is_calculated());
        assert!(template.field("missing").is_none());
    }

    #[test]
    fn test_check_structure_ok() {
        assert!(weighing().check_structure().is_ok());
    }

    #[test]
    fn test_duplicate_across_contexts() {
        let template = weighing().with_field(FieldDefinition::text("gross", "Again").in_header());
        assert_eq!(
            template.check_structure(),
            Err(Error::DuplicateFieldId("gross".into()))
        );
    }

    #[test]
    fn test_invalid_id() {
        let template = Template::new("t").with_field(FieldDefinition::numeric("net weight", "N"));
        assert_eq!(
            template.check_structure(),
            Err(Error::InvalidFieldId("net weight".into()))
        );
    }

    #[test]
    fn test_formula_presence() {
        let mut calc = FieldDefinition::new("c", "C", FieldKind::Calculated);
        let template = Template::new("t").with_field(calc.clone());
        assert_eq!(
            template.check_structure(),
            Err(Error::MissingFormula("c".into()))
        );

        calc.formula = Some("  ".into());
        let template = Template::new("t").with_field(calc);
        assert_eq!(
            template.check_structure(),
            Err(Error::MissingFormula("c".into()))
        );

        let mut numeric = FieldDefinition::numeric("n", "N");
        numeric.formula = Some("1+1".into());
        let template = Template::new("t").with_field(numeric);
        assert_eq!(
            template.check_structure(),
            Err(Error::UnexpectedFormula("n".into()))
        );
    }

    #[test]
    fn test_bounds() {
        let template = Template::new("t").with_field(
            FieldDefinition::numeric("n", "N").with_bounds(Some(5.0), Some(1.0)),
        );
        assert!(matches!(
            template.check_structure(),
            Err(Error::InvalidBounds { .. })
        ));

        let template = Template::new("t").with_row_bounds(3, Some(2));
        assert_eq!(
            template.check_structure(),
            Err(Error::InvalidRowBounds { min: 3, max: 2 })
        );
    }

    #[test]
    fn test_default_kind() {
        let template = Template::new("t")
            .with_field(FieldDefinition::numeric("n", "N").with_default(FieldSlot::Boolean(true)));
        assert_eq!(
            template.check_structure(),
            Err(Error::DefaultKindMismatch {
                field: "n".into(),
                kind: FieldKind::Numeric,
            })
        );

        let template = Template::new("t").with_field(
            FieldDefinition::calculated("c", "C", "1").with_default(FieldSlot::Calculated(1.0)),
        );
        assert!(matches!(
            template.check_structure(),
            Err(Error::DefaultKindMismatch { .. })
        ));
    }

    #[test]
    fn test_row_count() {
        let template = weighing();
        assert!(!template.accepts_row_count(0));
        assert!(template.accepts_row_count(1));
        assert!(template.accepts_row_count(10));
        assert!(!template.accepts_row_count(11));
        assert!(Template::new("t").accepts_row_count(1000));
    }
}
