use std::io;

use serde_json::Value;

use super::format::{count, key_value_rows, render_table, rows, text};

pub fn render_reshape(data: &Value) -> io::Result<String> {
    let preview = data
        .get("records_preview")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("reshape output requires records_preview"))?;
    let total = count(data, "records_total");
    let sheets = rows(data, "sheets_processed")
        .iter()
        .filter_map(Value::as_str)
        .collect::<Vec<&str>>();

    let mut lines = vec![
        format!("Reshaped {total} record(s) from {} fOut_ sheet(s).", sheets.len()),
        String::new(),
    ];
    lines.extend(key_value_rows(
        &[
            ("Organisation:", text(data, "organisation_cd")),
            ("Submission period:", text(data, "submission_period_cd")),
            ("Sheets:", sheets.join(", ")),
        ],
        2,
    ));

    if !preview.is_empty() {
        lines.push(String::new());
        if data.get("records_truncated").and_then(Value::as_bool) == Some(true) {
            lines.push(format!("Records (first {} of {total}):", preview.len()));
        } else {
            lines.push("Records:".to_string());
        }
        let table_rows = preview
            .iter()
            .map(|record| {
                vec![
                    text(record, "Sheet_Cd"),
                    text(record, "Measure_Cd"),
                    text(record, "Observation_Period_Cd"),
                    text(record, "Measure_Value"),
                    text(record, "Measure_Unit"),
                ]
            })
            .collect::<Vec<_>>();
        lines.extend(render_table(
            &["Sheet", "Measure", "Period", "Value", "Unit"],
            &table_rows,
        ));
    }

    lines.push(String::new());
    match data.get("output_path").and_then(Value::as_str) {
        Some(path) => lines.push(format!("Records written to {path}.")),
        None => lines.push("Add `--out <file.csv>` to save every record.".to_string()),
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_reshape;

    #[test]
    fn renders_summary_preview_and_output_path() {
        let data = json!({
            "organisation_cd": "ORG1",
            "submission_period_cd": "2025-26",
            "sheets_processed": ["fOut_Water"],
            "records_total": 2,
            "records_preview": [
                {"Sheet_Cd": "fOut_Water", "Measure_Cd": "W1", "Observation_Period_Cd": "2024-25",
                 "Measure_Value": "10", "Measure_Unit": "Ml/d"}
            ],
            "records_truncated": false,
            "output_path": "/tmp/out.csv"
        });

        let rendered = render_reshape(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Reshaped 2 record(s) from 1 fOut_ sheet(s)."));
            assert!(text.contains("  Sheets:             fOut_Water"));
            assert!(text.contains("W1"));
            assert!(text.contains("Records written to /tmp/out.csv."));
        }
    }
}
