//! Record and sheet row types

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;

/// 1-based row number in the sheet. Row 1 holds the headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowLocator(pub u32);

impl RowLocator {
    /// Locator of the `index`-th data row (0-based), skipping the header row.
    pub fn from_data_index(index: usize) -> Self {
        RowLocator(index as u32 + 2)
    }

    pub fn row(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RowLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}", self.0)
    }
}

/// One data row as returned by the store.
///
/// Cells are kept both in column order and keyed by header name. Columns
/// with a blank header are reachable by position only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    pub locator: RowLocator,
    /// Column 1 first. May be shorter than the header row.
    pub cells: Vec<String>,
    pub fields: HashMap<String, String>,
}

impl SheetRow {
    /// Row built from the sheet's header row and this row's cells.
    pub fn from_cells(locator: RowLocator, headers: &[String], cells: Vec<String>) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.is_empty())
            .map(|(column, header)| {
                let value = cells.get(column).cloned().unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        Self {
            locator,
            cells,
            fields,
        }
    }

    /// Cell value for `header`, or an empty string when the column is missing.
    pub fn get(&self, header: &str) -> &str {
        self.fields.get(header).map(String::as_str).unwrap_or("")
    }

    /// Cell at the 1-based `column`, or an empty string past the row's end.
    pub fn cell(&self, column: u32) -> &str {
        (column as usize)
            .checked_sub(1)
            .and_then(|index| self.cells.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A trackable item resolved from the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub identifier: Identifier,
    pub display_name: String,
    pub delivered: bool,
    pub delivered_at: Option<String>,
    pub locator: RowLocator,
}

/// Where the bot finds its columns.
///
/// Identifier and name are looked up by header. The delivered flag and its
/// timestamp are addressed by position, the same cells the update writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub identifier_header: String,
    pub name_header: String,
    /// 1-based column of the delivered flag; the timestamp sits in the next one.
    pub delivered_column: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            identifier_header: "DNI".to_string(),
            name_header: "Nombre".to_string(),
            delivered_column: 3,
        }
    }
}

/// Sheet cells hold `TRUE`/`FALSE` as text; anything else is "not delivered".
pub fn parse_delivered_flag(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case("TRUE")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_index_skips_header_row() {
        assert_eq!(RowLocator::from_data_index(0), RowLocator(2));
        assert_eq!(RowLocator::from_data_index(9).row(), 11);
    }

    #[test]
    fn delivered_flag_parsing() {
        assert!(parse_delivered_flag("TRUE"));
        assert!(parse_delivered_flag("true"));
        assert!(!parse_delivered_flag("FALSE"));
        assert!(!parse_delivered_flag(""));
        assert!(!parse_delivered_flag("yes"));
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn missing_column_reads_empty() {
        let row = SheetRow::from_cells(
            RowLocator(2),
            &headers(&["DNI", "Nombre"]),
            vec!["1".to_string()],
        );
        assert_eq!(row.get("Nombre"), "");
        assert_eq!(row.get("DNI"), "1");
        assert_eq!(row.cell(2), "");
        assert_eq!(row.cell(0), "");
    }

    #[test]
    fn blank_header_columns_stay_addressable_by_position() {
        let row = SheetRow::from_cells(
            RowLocator(5),
            &headers(&["DNI", "", "Entregado", ""]),
            vec!["1".into(), "x".into(), "TRUE".into(), "2024-05-01 09:30:00".into()],
        );
        assert_eq!(row.fields.len(), 2);
        assert_eq!(row.cell(2), "x");
        assert_eq!(row.cell(4), "2024-05-01 09:30:00");
        assert_eq!(row.get("Entregado"), "TRUE");
    }
}
