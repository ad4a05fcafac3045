use std::cmp;

use serde_json::Value;

const INDENT: &str = "  ";
const COLUMN_GAP: &str = "  ";
const MAX_CELL_WIDTH: usize = 40;

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Left-aligned table; cells longer than the column cap are cut with `…`.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths = headers.iter().map(|name| name.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = cmp::max(*width, cmp::min(cell.chars().count(), MAX_CELL_WIDTH));
            }
        }
    }

    let header = headers.iter().map(|name| name.to_string()).collect::<Vec<_>>();
    std::iter::once(&header)
        .chain(rows)
        .map(|row| format_row(row, &widths))
        .collect()
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let pieces = widths
        .iter()
        .enumerate()
        .map(|(index, &width)| {
            let cell = truncate(cells.get(index).map(String::as_str).unwrap_or(""), width);
            format!("{cell:<width$}")
        })
        .collect::<Vec<_>>();
    format!("{INDENT}{}", pieces.join(COLUMN_GAP)).trim_end().to_string()
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept = value.chars().take(width.saturating_sub(1)).collect::<String>();
    format!("{kept}…")
}

pub fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

pub fn count(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

pub fn rows<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{key_value_rows, render_table, text, truncate};

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(
            &[
                ("Batch:", "batch_1".to_string()),
                ("Diff entries:", "3".to_string()),
            ],
            2,
        );

        assert_eq!(rows[0], "  Batch:         batch_1");
        assert_eq!(rows[1], "  Diff entries:  3");
    }

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let rendered = render_table(
            &["Org", "Count"],
            &[vec!["ORG1".to_string(), "12".to_string()]],
        );
        assert_eq!(rendered[0], "  Org   Count");
        assert_eq!(rendered[1], "  ORG1  12");
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("éé", 4), "éé");
    }

    #[test]
    fn text_reads_strings_numbers_and_nulls() {
        let value = json!({"a": "x", "b": 2, "c": null});
        assert_eq!(text(&value, "a"), "x");
        assert_eq!(text(&value, "b"), "2");
        assert_eq!(text(&value, "c"), "");
        assert_eq!(text(&value, "missing"), "");
    }
}
