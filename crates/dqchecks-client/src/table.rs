use crate::{ClientError, ClientResult};

pub type Cell = Option<String>;

/// A header row plus row-major cells, as loaded from CSV or a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect()
    }

    pub fn require_columns(&self, dataset: &str, required: &[&str]) -> ClientResult<()> {
        let missing = self.missing_columns(required);
        if missing.is_empty() {
            return Ok(());
        }
        Err(ClientError::schema_mismatch(
            dataset,
            missing,
            self.columns.clone(),
        ))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::Table;

    #[test]
    fn require_columns_reports_every_missing_name() {
        let table = Table::with_columns(["Organisation_Cd", "Measure_Cd"]);
        let result = table.require_columns("flat", &["Organisation_Cd", "Sheet_Cd", "Cell_Cd"]);

        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "schema_mismatch");
            assert!(error.message.contains("Sheet_Cd, Cell_Cd"));
        }
    }

    #[test]
    fn push_row_pads_short_rows() {
        let mut table = Table::with_columns(["A", "B", "C"]);
        table.push_row(vec![Some("1".to_string())]);

        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.value(0, "A"), Some("1"));
        assert_eq!(table.value(0, "C"), None);
        assert_eq!(table.value(0, "Z"), None);
    }
}
