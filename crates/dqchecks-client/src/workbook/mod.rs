//! In-memory spreadsheet grids and the structural checks run over them.

pub mod formulas;
pub mod reshape;
pub mod structure;

use std::path::Path;

use serde::Serialize;

use crate::ClientResult;
use crate::load;
use crate::table::Cell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }

    /// Builds a sheet from string literals; empty strings become blank cells.
    pub fn from_rows(name: &str, rows: &[&[&str]]) -> Self {
        let grid = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| (!value.is_empty()).then(|| value.to_string()))
                    .collect()
            })
            .collect();
        Self::new(name, grid)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }

    /// Used range as (rows, columns), ignoring trailing blank cells.
    pub fn dimensions(&self) -> (usize, usize) {
        let mut max_row = 0;
        let mut max_column = 0;
        for (row_index, row) in self.rows.iter().enumerate() {
            if let Some(last) = row.iter().rposition(|cell| is_filled(cell.as_deref())) {
                max_row = row_index + 1;
                max_column = max_column.max(last + 1);
            }
        }
        (max_row, max_column)
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions() == (0, 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Loads one sheet per CSV export; each sheet is named after its file stem.
    pub fn from_csv_exports(paths: &[String]) -> ClientResult<Self> {
        let mut sheets = Vec::with_capacity(paths.len());
        for path in paths {
            let name = Path::new(path)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(path.as_str());
            sheets.push(Sheet::new(name, load::load_grid(path)?));
        }
        Ok(Self::new(sheets))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Zero-based (row, column) to an A1 reference: (0, 0) -> `A1`, (4, 27) -> `AB5`.
pub fn cell_reference(row: usize, column: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = column + 1;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push(char::from(b'A' + offset as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", letters.into_iter().collect::<String>(), row + 1)
}

pub(crate) fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{Sheet, cell_reference};

    #[test]
    fn cell_references_use_excel_lettering() {
        assert_eq!(cell_reference(0, 0), "A1");
        assert_eq!(cell_reference(2, 25), "Z3");
        assert_eq!(cell_reference(4, 27), "AB5");
        assert_eq!(cell_reference(0, 701), "ZZ1");
        assert_eq!(cell_reference(0, 702), "AAA1");
    }

    #[test]
    fn dimensions_ignore_trailing_blanks() {
        let sheet = Sheet::from_rows("S", &[&["Name", "Age", ""], &["Alice", "30"], &["", ""]]);
        assert_eq!(sheet.dimensions(), (2, 2));
        assert!(!sheet.is_empty());
        assert!(Sheet::from_rows("E", &[&["", " "]]).is_empty());
    }
}
