use std::io;

use serde_json::Value;

use super::format::{rows, text};

pub fn render_schema(data: &Value) -> io::Result<String> {
    let inputs = data
        .get("inputs")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("schema output requires inputs"))?;
    let outputs = data
        .get("outputs")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("schema output requires outputs"))?;

    let mut lines = vec![
        "Both QA inputs are CSV files with a header row or JSON arrays of objects.".to_string(),
        "Rows are joined on the key columns after normalization.".to_string(),
        String::new(),
        format!("Key columns: {}", names(rows(data, "key_cols")).join(", ")),
    ];

    for input in inputs {
        lines.push(String::new());
        lines.push(format!("Input: {}", text(input, "dataset")));
        lines.push(format!("  Required: {}", names(rows(input, "required")).join(", ")));
        let optional = names(rows(input, "optional"));
        if !optional.is_empty() {
            lines.push(format!("  Optional: {}", optional.join(", ")));
        }
    }

    for output in outputs {
        lines.push(String::new());
        lines.push(format!(
            "Output: {} ({})",
            text(output, "name"),
            text(output, "file_name")
        ));
        for column in names(rows(output, "columns")) {
            lines.push(format!("  {column}"));
        }
    }

    lines.push(String::new());
    lines.push("Error types:".to_string());
    for error_type in names(rows(data, "error_types")) {
        lines.push(format!("  {error_type}"));
    }

    Ok(lines.join("\n"))
}

fn names(values: &[Value]) -> Vec<&str> {
    values.iter().filter_map(Value::as_str).collect()
}
