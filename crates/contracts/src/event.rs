//! ChangeEvent - Ingestion output
//!
//! Normalized representation of a change in the tabular store.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;

use crate::CellValue;

/// Field label -> response value, reduced from a form submission
pub type FieldResponses = HashMap<String, String>;

/// Kind of change, used to select the interpretation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new record was submitted through the form
    Created,
    /// A cell of an existing record was edited
    Edited,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Edited => f.write_str("edited"),
        }
    }
}

/// Normalized change event
///
/// Immutable once constructed; fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    Created(CreatedRecord),
    Edited(EditedCell),
}

impl ChangeEvent {
    /// Build a creation event from reduced field responses
    pub fn created(field_responses: FieldResponses) -> Self {
        Self::Created(CreatedRecord { field_responses })
    }

    /// Build an edit event
    pub fn edited(
        sheet: impl Into<String>,
        row: NonZeroUsize,
        column: NonZeroUsize,
        row_snapshot: Vec<CellValue>,
    ) -> Self {
        Self::Edited(EditedCell {
            sheet: sheet.into(),
            row,
            column,
            row_snapshot,
        })
    }

    /// Event kind
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Created(_) => EventKind::Created,
            Self::Edited(_) => EventKind::Edited,
        }
    }
}

/// Payload of a [`ChangeEvent::Created`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecord {
    field_responses: FieldResponses,
}

impl CreatedRecord {
    pub fn field_responses(&self) -> &FieldResponses {
        &self.field_responses
    }

    /// Response for a field label, if the form carried that field
    pub fn response(&self, label: &str) -> Option<&str> {
        self.field_responses.get(label).map(String::as_str)
    }
}

/// Payload of a [`ChangeEvent::Edited`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditedCell {
    sheet: String,
    row: NonZeroUsize,
    column: NonZeroUsize,
    row_snapshot: Vec<CellValue>,
}

impl EditedCell {
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// 1-based edited row
    pub fn row(&self) -> usize {
        self.row.get()
    }

    /// 1-based edited column
    pub fn column(&self) -> usize {
        self.column.get()
    }

    /// Current values of the whole edited row
    pub fn row_snapshot(&self) -> &[CellValue] {
        &self.row_snapshot
    }

    /// Value at a 1-based column, `None` if outside the snapshot
    pub fn value_at(&self, column: usize) -> Option<&CellValue> {
        column
            .checked_sub(1)
            .and_then(|idx| self.row_snapshot.get(idx))
    }
}
