//! Whole-template validation
//!
//! Combines the structural checks from `qualdoc-core` with formula
//! validation for every calculated field.

use qualdoc_core::{Error, FieldDefinition, Result, Template};
use qualdoc_formula::check_formula;

/// Validate a template before it is published
///
/// Runs [`Template::check_structure`], then validates each calculated
/// field's formula. A row field may reference any row field and any header
/// field; a header field may reference header fields only. Self-references
/// and cycles pass here and simply never resolve.
///
/// # Example
/// ```rust
/// use qualdoc::{validate_template, FieldDefinition, Template};
///
/// let template = Template::new("Weighing")
///     .with_field(FieldDefinition::numeric("gross", "Gross"))
///     .with_field(FieldDefinition::calculated("net", "Net", "{gross}-{header.tare}"));
///
/// let err = validate_template(&template).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Invalid formula for field 'net': unknown header field: tare"
/// );
/// ```
pub fn validate_template(template: &Template) -> Result<()> {
    template.check_structure()?;

    let header_ids = template.header_field_ids();
    let row_ids = template.row_field_ids();
    let no_row_ids: &[&str] = &[];

    for field in template.fields.iter().filter(|f| f.is_calculated()) {
        let formula = formula_of(field)?;
        let available_rows = if field.is_header() {
            no_row_ids
        } else {
            row_ids.as_slice()
        };

        check_formula(formula, available_rows, &header_ids).map_err(|e| {
            tracing::debug!(field = %field.id, error = %e, "template formula rejected");
            Error::InvalidFormula {
                field: field.id.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    Ok(())
}

fn formula_of(field: &FieldDefinition) -> Result<&str> {
    field
        .formula
        .as_deref()
        .ok_or_else(|| Error::MissingFormula(field.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn invalid(field: &str, reason: &str) -> Error {
        Error::InvalidFormula {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[test]
    fn test_valid_template() {
        let template = Template::new("Weighing")
            .with_field(FieldDefinition::numeric("tare", "Tare").in_header())
            .with_field(
                FieldDefinition::calculated("double_tare", "2x tare", "{header.tare}*2")
                    .in_header(),
            )
            .with_field(FieldDefinition::numeric("gross", "Gross"))
            .with_field(FieldDefinition::calculated(
                "net",
                "Net",
                "{gross}-{header.double_tare}",
            ));
        assert_eq!(validate_template(&template), Ok(()));
    }

    #[test]
    fn test_forward_and_self_references_pass() {
        let template = Template::new("t")
            .with_field(FieldDefinition::calculated("b", "B", "{a}*2"))
            .with_field(FieldDefinition::calculated("a", "A", "{a}+1"));
        assert_eq!(validate_template(&template), Ok(()));
    }

    #[test]
    fn test_header_field_cannot_reference_rows() {
        let template = Template::new("t")
            .with_field(FieldDefinition::numeric("gross", "Gross"))
            .with_field(FieldDefinition::calculated("h", "H", "{gross}").in_header());
        assert_eq!(
            validate_template(&template),
            Err(invalid("h", "unknown row field: gross"))
        );
    }

    #[test]
    fn test_unknown_references() {
        let template = Template::new("t")
            .with_field(FieldDefinition::numeric("a", "A"))
            .with_field(FieldDefinition::calculated("c", "C", "{a}+{b}"));
        assert_eq!(
            validate_template(&template),
            Err(invalid("c", "unknown row field: b"))
        );
    }

    #[test]
    fn test_syntax_error() {
        let template = Template::new("t")
            .with_field(FieldDefinition::numeric("a", "A"))
            .with_field(FieldDefinition::calculated("c", "C", "({a}+1"));
        assert_eq!(
            validate_template(&template),
            Err(invalid("c", "invalid formula syntax"))
        );
    }

    #[test]
    fn test_structure_checked_first() {
        let template = Template::new("t")
            .with_field(FieldDefinition::numeric("a", "A"))
            .with_field(FieldDefinition::numeric("a", "A again"));
        assert_eq!(
            validate_template(&template),
            Err(Error::DuplicateFieldId("a".into()))
        );
    }
}
