//! Cell addressing and values
//!
//! Rows and columns are 1-based everywhere, matching the store's native indexing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// A single cell value as the store reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    /// Whether the cell holds nothing (or only an empty string)
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Interpret the value as a positive integer (e.g. a column index).
    ///
    /// Accepts integral numbers and text holding an integer.
    pub fn as_positive_index(&self) -> Option<usize> {
        match self {
            Self::Number(n) if n.fract() == 0.0 && *n >= 1.0 && *n <= u32::MAX as f64 => {
                Some(*n as usize)
            }
            Self::Text(s) => s.trim().parse::<usize>().ok().filter(|n| *n >= 1),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            // Integral numbers render without a trailing ".0", like a sheet does
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A1-style cell reference (`B3`, `$AA$10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    row: usize,
    column: usize,
}

impl CellRef {
    /// Create from 1-based row and column.
    ///
    /// # Errors
    /// Returns `InvalidCellRef` if either index is zero.
    pub fn new(row: usize, column: usize) -> Result<Self, ContractError> {
        if row == 0 || column == 0 {
            return Err(ContractError::invalid_cell_ref(
                format!("R{row}C{column}"),
                "row and column are 1-based",
            ));
        }
        Ok(Self { row, column })
    }

    /// 1-based row
    pub fn row(&self) -> usize {
        self.row
    }

    /// 1-based column
    pub fn column(&self) -> usize {
        self.column
    }
}

/// Convert a 1-based column index to its letter form (1 -> A, 27 -> AA)
pub fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

impl FromStr for CellRef {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != '$').collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| ContractError::invalid_cell_ref(s, "missing row number"))?;
        let (letters, digits) = cleaned.split_at(split);

        if letters.is_empty() {
            return Err(ContractError::invalid_cell_ref(s, "missing column letters"));
        }

        let mut column: usize = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(ContractError::invalid_cell_ref(
                    s,
                    format!("unexpected character '{c}'"),
                ));
            }
            let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            column = column
                .checked_mul(26)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| ContractError::invalid_cell_ref(s, "column out of range"))?;
        }

        let row: usize = digits
            .parse()
            .map_err(|_| ContractError::invalid_cell_ref(s, "row is not a number"))?;

        Self::new(row, column).map_err(|_| ContractError::invalid_cell_ref(s, "row must be >= 1"))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row)
    }
}

impl Serialize for CellRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A cell on a named sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellLocation {
    pub sheet: String,
    pub cell: CellRef,
}

impl CellLocation {
    pub fn new(sheet: impl Into<String>, cell: CellRef) -> Self {
        Self {
            sheet: sheet.into(),
            cell,
        }
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, self.cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_a1() {
        let cell: CellRef = "B3".parse().unwrap();
        assert_eq!(cell.row(), 3);
        assert_eq!(cell.column(), 2);

        let wide: CellRef = "$AA$10".parse().unwrap();
        assert_eq!(wide.column(), 27);
        assert_eq!(wide.row(), 10);

        let lower: CellRef = "c1".parse().unwrap();
        assert_eq!(lower.column(), 3);
    }

    #[test]
    fn test_parse_a1_rejects_garbage() {
        assert!("".parse::<CellRef>().is_err());
        assert!("12".parse::<CellRef>().is_err());
        assert!("B".parse::<CellRef>().is_err());
        assert!("B0".parse::<CellRef>().is_err());
        assert!("B-1".parse::<CellRef>().is_err());
        assert!("B2C".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_display_matches_input() {
        for s in ["A1", "Z9", "AA10", "AZ3", "BA1"] {
            let cell: CellRef = s.parse().unwrap();
            assert_eq!(cell.to_string(), s);
        }
    }

    #[test]
    fn test_number_display() {
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_positive_index() {
        assert_eq!(CellValue::Number(3.0).as_positive_index(), Some(3));
        assert_eq!(CellValue::Text(" 4 ".into()).as_positive_index(), Some(4));
        assert_eq!(CellValue::Number(0.0).as_positive_index(), None);
        assert_eq!(CellValue::Number(1.5).as_positive_index(), None);
        assert_eq!(CellValue::Text("status".into()).as_positive_index(), None);
        assert_eq!(CellValue::Empty.as_positive_index(), None);
    }

    #[test]
    fn test_cell_value_serde() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"["Ticket#42", 3, true, null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::Text("Ticket#42".into()),
                CellValue::Number(3.0),
                CellValue::Bool(true),
                CellValue::Empty,
            ]
        );
    }

    #[test]
    fn test_location_display() {
        let loc = CellLocation::new("Config", "B1".parse().unwrap());
        assert_eq!(loc.to_string(), "Config!B1");
    }
}
