//! Document instances - one filled-in copy of a template

use std::fmt;

use crate::error::{Error, Result};
use crate::template::Template;
use crate::value::{FieldSlot, FieldValue, FieldValues};

/// Workflow state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DocumentStatus {
    #[default]
    Draft,
    WorkerFilled,
    Complete,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::WorkerFilled => "worker_filled",
            DocumentStatus::Complete => "complete",
        }
    }

    /// The state that follows this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            DocumentStatus::Draft => Some(DocumentStatus::WorkerFilled),
            DocumentStatus::WorkerFilled => Some(DocumentStatus::Complete),
            DocumentStatus::Complete => None,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document instance: one header value set plus an ordered list of rows
///
/// The row count is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentInstance {
    /// Name of the owning template
    pub template: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: DocumentStatus,
    pub header: FieldValues,
    pub rows: Vec<FieldValues>,
}

impl DocumentInstance {
    /// Create a blank document for `template` with `row_count` rows
    ///
    /// Every field gets a value, populated with its default when the
    /// definition carries one.
    pub fn new(template: &Template, row_count: usize) -> Result<Self> {
        if !template.accepts_row_count(row_count) {
            return Err(Error::RowCountOutOfBounds {
                count: row_count,
                min: template.min_rows,
                max: template.max_rows,
            });
        }

        let header = template
            .header_fields()
            .map(FieldValue::for_definition)
            .collect();
        let rows = (0..row_count)
            .map(|_| {
                template
                    .row_fields()
                    .map(FieldValue::for_definition)
                    .collect()
            })
            .collect();

        Ok(Self {
            template: template.name.clone(),
            status: DocumentStatus::Draft,
            header,
            rows,
        })
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn header_value(&self, field_id: &str) -> Option<&FieldValue> {
        self.header.get(field_id)
    }

    pub fn row_value(&self, row: usize, field_id: &str) -> Option<&FieldValue> {
        self.rows.get(row).and_then(|r| r.get(field_id))
    }

    /// Store user input into a header field
    pub fn set_header_input(&mut self, field_id: &str, slot: impl Into<FieldSlot>) -> Result<()> {
        self.header
            .get_mut(field_id)
            .ok_or_else(|| Error::UnknownField(field_id.to_string()))?
            .set_input(slot.into())
    }

    /// Store user input into a row field
    pub fn set_row_input(
        &mut self,
        row: usize,
        field_id: &str,
        slot: impl Into<FieldSlot>,
    ) -> Result<()> {
        let count = self.rows.len();
        self.rows
            .get_mut(row)
            .ok_or(Error::RowOutOfBounds(row, count))?
            .get_mut(field_id)
            .ok_or_else(|| Error::UnknownField(field_id.to_string()))?
            .set_input(slot.into())
    }

    /// Move to the next workflow state
    ///
    /// Callers are expected to re-resolve calculated fields before
    /// persisting the transition.
    pub fn advance(&mut self) -> Result<DocumentStatus> {
        let next = self
            .status
            .next()
            .ok_or(Error::InvalidTransition(self.status.as_str()))?;
        self.status = next;
        Ok(next)
    }
}
