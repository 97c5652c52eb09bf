//! # Store
//!
//! In-memory workbook implementing [`TabularStore`].
//!
//! Loaded from a JSON snapshot of the spreadsheet:
//!
//! ```json
//! {
//!   "sheets": {
//!     "Config":  [["Interest field", "Error Type"], ["Category field", "Department"]],
//!     "Tickets": [["Ticket", "Opened", "Status"], ["Ticket#42", "open", "resolved"]]
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use contracts::{CellRef, CellValue, ContractError, TabularStore};

/// Sheet contents, row-major, ragged rows allowed
pub type SheetRows = Vec<Vec<CellValue>>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct WorkbookSnapshot {
    #[serde(default)]
    sheets: HashMap<String, SheetRows>,
}

/// Workbook held in memory
///
/// Reads and writes go through a lock so one instance can be shared across tasks.
#[derive(Debug, Default)]
pub struct WorkbookStore {
    sheets: RwLock<HashMap<String, SheetRows>>,
}

impl WorkbookStore {
    /// Create an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a sheet, builder style
    pub fn with_sheet(self, name: impl Into<String>, rows: SheetRows) -> Self {
        self.sheets.write().insert(name.into(), rows);
        self
    }

    /// Parse a JSON snapshot
    pub fn from_json(content: &str) -> Result<Self, ContractError> {
        let snapshot: WorkbookSnapshot =
            serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
                message: format!("workbook parse error: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            sheets: RwLock::new(snapshot.sheets),
        })
    }

    /// Load a JSON snapshot file
    #[instrument(name = "workbook_load", skip(path), fields(path = %path.display()))]
    pub fn load_from_path(path: &Path) -> Result<Self, ContractError> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json(&content)?;
        debug!(sheets = store.sheet_names().len(), "Workbook loaded");
        Ok(store)
    }

    /// Serialize the current contents back to JSON
    pub fn to_json(&self) -> Result<String, ContractError> {
        let snapshot = WorkbookSnapshot {
            sheets: self.sheets.read().clone(),
        };
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| ContractError::Other(format!("workbook serialize error: {e}")))
    }

    /// Names of all sheets, sorted
    pub fn sheet_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.sheets.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl TabularStore for WorkbookStore {
    fn get_cell_value(&self, sheet: &str, cell: CellRef) -> Result<CellValue, ContractError> {
        let sheets = self.sheets.read();
        let rows = sheets
            .get(sheet)
            .ok_or_else(|| ContractError::sheet_not_found(sheet))?;
        Ok(rows
            .get(cell.row() - 1)
            .and_then(|row| row.get(cell.column() - 1))
            .cloned()
            .unwrap_or_default())
    }

    fn get_row(
        &self,
        sheet: &str,
        row: usize,
        column_count: usize,
    ) -> Result<Vec<CellValue>, ContractError> {
        if row == 0 {
            return Err(ContractError::invalid_cell_ref(
                format!("{sheet}!R0"),
                "rows are 1-based",
            ));
        }
        let sheets = self.sheets.read();
        let rows = sheets
            .get(sheet)
            .ok_or_else(|| ContractError::sheet_not_found(sheet))?;

        let source = rows.get(row - 1).map(Vec::as_slice).unwrap_or(&[]);
        Ok((0..column_count)
            .map(|idx| source.get(idx).cloned().unwrap_or_default())
            .collect())
    }

    fn last_column(&self, sheet: &str) -> Result<usize, ContractError> {
        let sheets = self.sheets.read();
        let rows = sheets
            .get(sheet)
            .ok_or_else(|| ContractError::sheet_not_found(sheet))?;

        // Trailing empty cells do not count as data
        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .rposition(|value| !value.is_empty())
                    .map_or(0, |idx| idx + 1)
            })
            .max()
            .unwrap_or(0))
    }

    fn set_cell_value(
        &self,
        sheet: &str,
        cell: CellRef,
        value: CellValue,
    ) -> Result<(), ContractError> {
        let mut sheets = self.sheets.write();
        let rows = sheets
            .get_mut(sheet)
            .ok_or_else(|| ContractError::sheet_not_found(sheet))?;

        if rows.len() < cell.row() {
            rows.resize_with(cell.row(), Vec::new);
        }
        let target = &mut rows[cell.row() - 1];
        if target.len() < cell.column() {
            target.resize(cell.column(), CellValue::Empty);
        }
        target[cell.column() - 1] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cell(s: &str) -> CellRef {
        s.parse().unwrap()
    }

    fn tickets() -> WorkbookStore {
        WorkbookStore::new().with_sheet(
            "Tickets",
            vec![
                vec!["Ticket".into(), "Opened".into(), "Status".into()],
                vec!["Ticket#42".into(), "open".into(), "resolved".into()],
                vec!["Ticket#43".into()],
            ],
        )
    }

    #[test]
    fn test_get_cell_value() {
        let store = tickets();
        assert_eq!(
            store.get_cell_value("Tickets", cell("A2")).unwrap(),
            CellValue::from("Ticket#42")
        );
        // Beyond data range reads as empty
        assert_eq!(
            store.get_cell_value("Tickets", cell("Z99")).unwrap(),
            CellValue::Empty
        );
    }

    #[test]
    fn test_unknown_sheet() {
        let store = tickets();
        let err = store.get_cell_value("Nope", cell("A1")).unwrap_err();
        assert!(matches!(err, ContractError::SheetNotFound { .. }));
    }

    #[test]
    fn test_get_row_pads_to_width() {
        let store = tickets();
        let row = store.get_row("Tickets", 3, 3).unwrap();
        assert_eq!(
            row,
            vec![CellValue::from("Ticket#43"), CellValue::Empty, CellValue::Empty]
        );
        assert!(store.get_row("Tickets", 0, 3).is_err());
    }

    #[test]
    fn test_last_column_ignores_trailing_empties() {
        let store = WorkbookStore::new().with_sheet(
            "S",
            vec![
                vec!["a".into(), CellValue::Empty, CellValue::Empty],
                vec!["a".into(), "b".into(), "".into()],
            ],
        );
        assert_eq!(store.last_column("S").unwrap(), 2);
        assert_eq!(
            WorkbookStore::new()
                .with_sheet("E", vec![])
                .last_column("E")
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_set_cell_value_grows_sheet() {
        let store = tickets();
        store
            .set_cell_value("Tickets", cell("E5"), CellValue::from("late"))
            .unwrap();
        assert_eq!(
            store.get_cell_value("Tickets", cell("E5")).unwrap(),
            CellValue::from("late")
        );
        assert_eq!(store.last_column("Tickets").unwrap(), 5);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workbook.json");
        std::fs::write(
            &path,
            r#"{ "sheets": { "Config": [["Interest", "Error Type"], ["Target", 3]] } }"#,
        )
        .unwrap();

        let store = WorkbookStore::load_from_path(&path).unwrap();
        assert_eq!(
            store.get_cell_value("Config", cell("B2")).unwrap(),
            CellValue::Number(3.0)
        );
        assert_eq!(store.sheet_names(), vec!["Config".to_string()]);
    }

    #[test]
    fn test_json_round_trip() {
        let store = tickets();
        let json = store.to_json().unwrap();
        let back = WorkbookStore::from_json(&json).unwrap();
        assert_eq!(
            back.get_row("Tickets", 2, 3).unwrap(),
            store.get_row("Tickets", 2, 3).unwrap()
        );
    }
}
