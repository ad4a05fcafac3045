use serde_json::{Map, Value};

use crate::table::{Cell, Table};
use crate::{ClientError, ClientResult};

pub(crate) fn parse_table(dataset: &str, content: &str) -> ClientResult<Table> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_input(
            dataset,
            &format!("The {dataset} source is empty."),
        ));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(dataset, trimmed);
    }

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(ClientError::invalid_input(
            dataset,
            "JSON input must be a top-level array of row objects.",
        ));
    }

    if looks_like_csv(trimmed) {
        return parse_csv(dataset, trimmed);
    }

    Err(ClientError::invalid_input(
        dataset,
        &format!("The {dataset} source is not tabular. Provide a JSON array or CSV with headers."),
    ))
}

/// Parses CSV without treating any row as a header. Rows may be ragged.
pub(crate) fn parse_grid(content: &str) -> ClientResult<Vec<Vec<Cell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|_| {
            ClientError::invalid_input("sheet", "Sheet rows are malformed or not UTF-8.")
        })?;
        grid.push(record.iter().map(cell_from_text).collect());
    }
    Ok(grid)
}

fn parse_json_array(dataset: &str, content: &str) -> ClientResult<Table> {
    let parsed = serde_json::from_str::<Value>(content).map_err(|_| {
        ClientError::invalid_input(dataset, "Invalid JSON input. Provide a valid JSON array.")
    })?;

    let Some(items) = parsed.as_array() else {
        return Err(ClientError::invalid_input(
            dataset,
            "JSON input must be a top-level array of row objects.",
        ));
    };

    let mut objects: Vec<&Map<String, Value>> = Vec::with_capacity(items.len());
    for item in items {
        let Some(object) = item.as_object() else {
            return Err(ClientError::invalid_input(
                dataset,
                "JSON array entries must all be objects keyed by column name.",
            ));
        };
        objects.push(object);
    }

    let mut columns: Vec<String> = Vec::new();
    for object in &objects {
        for key in object.keys() {
            if !columns.iter().any(|column| column == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = Table::with_columns(columns);
    for object in objects {
        let row = table
            .columns
            .iter()
            .map(|column| read_optional_string(object.get(column)))
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

fn parse_csv(dataset: &str, content: &str) -> ClientResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| {
            ClientError::invalid_input(dataset, "CSV header row is missing or unreadable.")
        })?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    let mut table = Table::with_columns(headers);
    for record in reader.records() {
        let record = record.map_err(|_| {
            ClientError::invalid_input(dataset, "CSV rows are malformed or not UTF-8.")
        })?;
        table.push_row(record.iter().map(cell_from_text).collect());
    }
    Ok(table)
}

fn cell_from_text(value: &str) -> Cell {
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

fn read_optional_string(value: Option<&Value>) -> Cell {
    match value? {
        Value::Null => None,
        Value::String(text) => cell_from_text(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}

fn looks_like_csv(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    first_line.contains(',')
}

#[cfg(test)]
mod tests {
    use super::{parse_grid, parse_table};

    #[test]
    fn csv_blank_cells_become_null() {
        let result = parse_table("flat", "Organisation_Cd,Region_Cd\nORG1,\n");
        assert!(result.is_ok());
        if let Ok(table) = result {
            assert_eq!(table.columns, vec!["Organisation_Cd", "Region_Cd"]);
            assert_eq!(table.value(0, "Organisation_Cd"), Some("ORG1"));
            assert_eq!(table.value(0, "Region_Cd"), None);
        }
    }

    #[test]
    fn json_numbers_are_stringified() {
        let body = r#"[{"Measure_Cd": "M1", "Measure_Value": 10.5, "Decimal_Point": 2, "Comment": null}]"#;
        let result = parse_table("semantic", body);
        assert!(result.is_ok());
        if let Ok(table) = result {
            assert_eq!(table.value(0, "Measure_Value"), Some("10.5"));
            assert_eq!(table.value(0, "Decimal_Point"), Some("2"));
            assert_eq!(table.value(0, "Comment"), None);
        }
    }

    #[test]
    fn json_rows_with_different_keys_share_one_header() {
        let body = r#"[{"A": "1"}, {"B": "2"}]"#;
        let result = parse_table("flat", body);
        assert!(result.is_ok());
        if let Ok(table) = result {
            assert_eq!(table.columns.len(), 2);
            assert_eq!(table.value(1, "A"), None);
            assert_eq!(table.value(1, "B"), Some("2"));
        }
    }

    #[test]
    fn non_tabular_sources_are_rejected() {
        for body in ["", "{\"a\": 1}", "[1, 2]", "just some text"] {
            let result = parse_table("flat", body);
            assert!(result.is_err(), "expected rejection for {body:?}");
            if let Err(error) = result {
                assert_eq!(error.code, "invalid_input");
            }
        }
    }

    #[test]
    fn grid_keeps_banner_rows_and_ragged_lines() {
        let result = parse_grid("Title\nReference,2024-25\nM1,10\n");
        assert!(result.is_ok());
        if let Ok(grid) = result {
            assert_eq!(grid.len(), 3);
            assert_eq!(grid[0], vec![Some("Title".to_string())]);
            assert_eq!(grid[2][1].as_deref(), Some("10"));
        }
    }
}
