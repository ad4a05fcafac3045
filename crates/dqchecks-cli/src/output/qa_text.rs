use std::io;

use serde_json::Value;

use super::format::{count, key_value_rows, render_table, rows, text};

pub fn render_qa_run(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("qa run output requires summary"))?;
    let partitions = data
        .get("partitions")
        .ok_or_else(|| io::Error::other("qa run output requires partitions"))?;
    let diff_total = count(data, "diff_total");

    let heading = if diff_total == 0 {
        "QA passed: the flat submission and the ingested data agree.".to_string()
    } else {
        format!("QA found {diff_total} difference(s).")
    };
    let target_org = match text(data, "target_org") {
        org if org.is_empty() => "all".to_string(),
        org => org,
    };

    let mut lines = vec![heading, String::new(), "Run:".to_string()];
    lines.extend(key_value_rows(
        &[
            ("Batch:", text(data, "batch_id")),
            ("Run at:", text(data, "qa_run_datetime")),
            ("Submission period:", text(data, "target_submission_period")),
            ("Organisation:", target_org),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Rows:".to_string());
    lines.extend(key_value_rows(
        &[
            ("Flat rows:", count(data, "flat_rows").to_string()),
            ("Ingested rows:", count(data, "semantic_rows").to_string()),
            ("Keys in both:", count(partitions, "in_both").to_string()),
            ("Only in flat:", count(partitions, "only_raw").to_string()),
            ("Only in ingested:", count(partitions, "only_ingested").to_string()),
            ("Matched rows:", count(summary, "Total_Matched_Rows").to_string()),
            (
                "Mismatched rows:",
                count(summary, "Total_Rows_With_Mismatches").to_string(),
            ),
            (
                "Cell differences:",
                count(summary, "Total_Cell_Level_Differences").to_string(),
            ),
        ],
        2,
    ));

    let error_counts = rows(data, "error_counts");
    if !error_counts.is_empty() {
        lines.push(String::new());
        lines.push("Errors by organisation:".to_string());
        let table_rows = error_counts
            .iter()
            .map(|row| {
                vec![
                    text(row, "Organisation_Cd"),
                    text(row, "Error_Type"),
                    text(row, "Error_Count"),
                ]
            })
            .collect::<Vec<_>>();
        lines.extend(render_table(&["Organisation", "Error type", "Count"], &table_rows));
    }

    let preview = rows(data, "diff_preview");
    if !preview.is_empty() {
        lines.push(String::new());
        if data.get("diff_truncated").and_then(Value::as_bool) == Some(true) {
            lines.push(format!(
                "Differences (first {} of {diff_total}):",
                preview.len()
            ));
        } else {
            lines.push("Differences:".to_string());
        }
        let table_rows = preview
            .iter()
            .map(|entry| {
                vec![
                    text(entry, "Organisation_Cd"),
                    text(entry, "Measure_Key"),
                    text(entry, "Observation_Period_Cd"),
                    text(entry, "Error_Type"),
                    text(entry, "Raw_Value"),
                    text(entry, "Ingested_Value"),
                ]
            })
            .collect::<Vec<_>>();
        lines.extend(render_table(
            &["Organisation", "Measure", "Period", "Error type", "Flat", "Ingested"],
            &table_rows,
        ));
    }

    let reports = rows(data, "reports");
    lines.push(String::new());
    if reports.is_empty() {
        lines.push(
            "Reports were not written. Add `--out-dir <dir>` to save the CSV tables.".to_string(),
        );
    } else {
        lines.push("Reports written:".to_string());
        for report in reports {
            lines.push(format!(
                "  {} ({} rows)",
                text(report, "path"),
                count(report, "rows")
            ));
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_qa_run;

    fn payload(diff_total: u64, truncated: bool) -> serde_json::Value {
        json!({
            "batch_id": "batch_1",
            "qa_run_datetime": "2025-01-01T00:00:00Z",
            "target_submission_period": "2025Q1",
            "target_org": null,
            "flat_rows": 3,
            "semantic_rows": 3,
            "partitions": {"only_raw": 1, "only_ingested": 1, "in_both": 2},
            "summary": {
                "Total_Matched_Rows": 1,
                "Total_Rows_With_Mismatches": 1,
                "Total_Cell_Level_Differences": 1
            },
            "error_counts": [
                {"Organisation_Cd": "ORG1", "Error_Type": "MEASURE_VALUE_MISMATCH", "Error_Count": 1, "Batch_Id": "batch_1"}
            ],
            "diff_total": diff_total,
            "diff_preview": [
                {"Organisation_Cd": "ORG1", "Measure_Key": "M2", "Observation_Period_Cd": "202501",
                 "Error_Type": "MEASURE_VALUE_MISMATCH", "Raw_Value": "20%", "Ingested_Value": "30"}
            ],
            "diff_truncated": truncated,
            "reports": []
        })
    }

    #[test]
    fn renders_counts_errors_and_differences() {
        let rendered = render_qa_run(&payload(3, false));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("QA found 3 difference(s)."));
            assert!(text.contains("  Organisation:       all"));
            assert!(text.contains("  Only in ingested:  1"));
            assert!(text.contains("Errors by organisation:"));
            assert!(text.contains("MEASURE_VALUE_MISMATCH"));
            assert!(text.contains("Differences:"));
            assert!(text.contains("--out-dir"));
        }
    }

    #[test]
    fn notes_truncated_previews() {
        let rendered = render_qa_run(&payload(120, true));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Differences (first 1 of 120):"));
        }
    }

    #[test]
    fn requires_summary() {
        assert!(render_qa_run(&json!({})).is_err());
    }
}
