//! TabularStore trait - read/write access to named cells and ranges
//!
//! The pipeline only ever reads; `set_cell_value` exists for adapters and tests.

use crate::{CellLocation, CellRef, CellValue, ContractError};

/// Spreadsheet-like store addressed by sheet name and 1-based cells
pub trait TabularStore: Send + Sync {
    /// Value of a single cell. Cells beyond the data range read as `Empty`.
    fn get_cell_value(&self, sheet: &str, cell: CellRef) -> Result<CellValue, ContractError>;

    /// `column_count` values of a 1-based row, padded with `Empty`
    fn get_row(
        &self,
        sheet: &str,
        row: usize,
        column_count: usize,
    ) -> Result<Vec<CellValue>, ContractError>;

    /// Index of the last column holding data (0 for an empty sheet)
    fn last_column(&self, sheet: &str) -> Result<usize, ContractError>;

    /// Overwrite a single cell
    fn set_cell_value(
        &self,
        sheet: &str,
        cell: CellRef,
        value: CellValue,
    ) -> Result<(), ContractError>;

    /// Read a cell by location
    fn get_location(&self, location: &CellLocation) -> Result<CellValue, ContractError> {
        self.get_cell_value(&location.sheet, location.cell)
    }
}
