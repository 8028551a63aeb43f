//! Calculated-field resolution
//!
//! Computes every calculated field of a document instance from the values
//! currently entered. Header fields are resolved in a single pass; each row
//! is resolved independently with a fixed number of passes so a calculated
//! field may depend on another calculated field declared after it.
//!
//! # Example
//!
//! ```rust
//! use qualdoc::prelude::*;
//!
//! let template = Template::new("Weighing")
//!     .with_field(FieldDefinition::numeric("tare", "Tare").in_header())
//!     .with_field(FieldDefinition::numeric("gross", "Gross"))
//!     .with_field(FieldDefinition::calculated("net", "Net", "{gross}-{header.tare}"));
//!
//! let mut doc = DocumentInstance::new(&template, 1).unwrap();
//! doc.set_header_input("tare", 12.0).unwrap();
//! doc.set_row_input(0, "gross", 80.0).unwrap();
//!
//! let stats = doc.resolve(&template);
//! assert_eq!(stats.row_resolved, 1);
//! assert_eq!(doc.row_value(0, "net").unwrap().calculated(), Some(68.0));
//! ```

use qualdoc_core::{DocumentInstance, FieldDefinition, FieldValues, Template};
use qualdoc_formula::{evaluate_formula, FormulaScope, ValueMap};

/// Number of passes over a row's calculated fields
///
/// Enough for the shallow dependency chains quality templates use. Deeper
/// chains declared against dependency order stay unresolved; cyclic
/// formulas simply never resolve.
pub const DEFAULT_ROW_PASSES: usize = 3;

/// Options for resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOptions {
    /// Passes over each row's calculated fields (default: 3)
    pub row_passes: usize,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            row_passes: DEFAULT_ROW_PASSES,
        }
    }
}

/// Statistics from a resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Calculated header fields with a value
    pub header_resolved: usize,
    /// Calculated header fields left empty
    pub header_unresolved: usize,
    /// Number of rows processed
    pub rows: usize,
    /// Calculated row values with a value, summed over rows
    pub row_resolved: usize,
    /// Calculated row values left empty, summed over rows
    pub row_unresolved: usize,
    /// Passes run per row
    pub passes: usize,
}

impl ResolutionStats {
    /// Whether every calculated field got a value
    pub fn is_complete(&self) -> bool {
        self.header_unresolved == 0 && self.row_unresolved == 0
    }
}

/// Extension trait for DocumentInstance to add resolution methods
pub trait DocumentResolutionExt {
    /// Resolve all calculated fields with default options
    fn resolve(&mut self, template: &Template) -> ResolutionStats;

    /// Resolve all calculated fields with custom options
    fn resolve_with_options(
        &mut self,
        template: &Template,
        options: &ResolutionOptions,
    ) -> ResolutionStats;
}

impl DocumentResolutionExt for DocumentInstance {
    fn resolve(&mut self, template: &Template) -> ResolutionStats {
        self.resolve_with_options(template, &ResolutionOptions::default())
    }

    fn resolve_with_options(
        &mut self,
        template: &Template,
        options: &ResolutionOptions,
    ) -> ResolutionStats {
        let resolver = Resolver::new(template, options);
        resolver.resolve(self)
    }
}

/// Resolve every calculated field, returning an updated copy
///
/// The input document is not modified. Precondition: `document` was built
/// from `template`; values whose ids the template does not know are left
/// untouched.
pub fn resolve_calculated_fields(
    template: &Template,
    document: &DocumentInstance,
) -> DocumentInstance {
    let mut resolved = document.clone();
    resolved.resolve(template);
    resolved
}

/// A calculated field and its formula, in declaration order
struct CalculatedField<'t> {
    id: &'t str,
    formula: &'t str,
}

impl<'t> CalculatedField<'t> {
    fn collect(fields: impl Iterator<Item = &'t FieldDefinition>) -> Vec<Self> {
        fields
            .filter(|f| f.is_calculated())
            .filter_map(|f| {
                f.formula.as_deref().map(|formula| CalculatedField {
                    id: f.id.as_str(),
                    formula,
                })
            })
            .collect()
    }
}

/// The resolution engine
struct Resolver<'t> {
    passes: usize,
    header_fields: Vec<CalculatedField<'t>>,
    row_fields: Vec<CalculatedField<'t>>,
}

impl<'t> Resolver<'t> {
    fn new(template: &'t Template, options: &ResolutionOptions) -> Self {
        Self {
            passes: options.row_passes,
            header_fields: CalculatedField::collect(template.header_fields()),
            row_fields: CalculatedField::collect(template.row_fields()),
        }
    }

    fn resolve(&self, document: &mut DocumentInstance) -> ResolutionStats {
        let mut stats = ResolutionStats {
            rows: document.rows.len(),
            passes: self.passes,
            ..Default::default()
        };

        // Results are recomputed from inputs every time
        clear_calculated(&mut document.header, &self.header_fields);
        for row in &mut document.rows {
            clear_calculated(row, &self.row_fields);
        }

        // Phase 1: header fields, single pass
        let mut scope = FormulaScope::with_header_values(lookup_table(&document.header));
        for field in &self.header_fields {
            let result = evaluate_formula(field.formula, &scope);
            if let Some(result) = result {
                scope.header_values.insert(field.id.to_string(), result);
            }

            match (result, document.header.get_mut(field.id)) {
                (Some(result), Some(value)) => {
                    value.set_calculated(Some(result));
                    tracing::trace!(field = field.id, result, "resolved header field");
                    stats.header_resolved += 1;
                }
                _ => {
                    tracing::trace!(field = field.id, "header field unresolved");
                    stats.header_unresolved += 1;
                }
            }
        }

        // Phase 2: rows, each with its own lookup
        for (index, row) in document.rows.iter_mut().enumerate() {
            scope.row_values = lookup_table(row);
            let mut written = vec![false; self.row_fields.len()];

            for pass in 0..self.passes {
                for (slot, field) in self.row_fields.iter().enumerate() {
                    if let Some(result) = evaluate_formula(field.formula, &scope) {
                        if let Some(value) = row.get_mut(field.id) {
                            value.set_calculated(Some(result));
                            written[slot] = true;
                        }
                        scope.row_values.insert(field.id.to_string(), result);
                        tracing::trace!(
                            row = index,
                            pass,
                            field = field.id,
                            result,
                            "resolved row field"
                        );
                    }
                }
            }

            for (field, written) in self.row_fields.iter().zip(written) {
                if written {
                    stats.row_resolved += 1;
                } else {
                    tracing::trace!(row = index, field = field.id, "row field unresolved");
                    stats.row_unresolved += 1;
                }
            }
        }

        tracing::debug!(
            header_resolved = stats.header_resolved,
            header_unresolved = stats.header_unresolved,
            rows = stats.rows,
            row_resolved = stats.row_resolved,
            row_unresolved = stats.row_unresolved,
            "resolved calculated fields"
        );

        stats
    }
}

/// Map every value with a number to its field id
fn lookup_table(values: &FieldValues) -> ValueMap {
    values
        .numbers()
        .map(|(id, n)| (id.to_string(), n))
        .collect()
}

fn clear_calculated(values: &mut FieldValues, fields: &[CalculatedField<'_>]) {
    for field in fields {
        if let Some(value) = values.get_mut(field.id) {
            value.set_calculated(None);
        }
    }
}
