use crate::contracts::types::{
    COMPANY_SUMMARY_COLUMNS, DIFF_COLUMNS, DatasetColumns, ERROR_COUNT_COLUMNS, OutputTable,
    SUMMARY_COLUMNS,
};
use crate::qa::records::{
    FLAT_DATASET, FLAT_OPTIONAL_COLUMNS, FLAT_REQUIRED_COLUMNS, INGESTED_DATASET,
    INGESTED_OPTIONAL_COLUMNS, INGESTED_REQUIRED_COLUMNS,
};
use crate::report::{COMPANY_SUMMARY_FILE, DIFF_FILE, ERROR_COUNTS_FILE, SUMMARY_FILE};
use crate::workbook::reshape::FOUT_COLUMNS;

/// Number of rows echoed back in command payloads; full tables go to files.
pub(crate) const PREVIEW_LIMIT: usize = 50;

pub(crate) fn preview<T: Clone>(rows: &[T]) -> (Vec<T>, bool) {
    let truncated = rows.len() > PREVIEW_LIMIT;
    (rows.iter().take(PREVIEW_LIMIT).cloned().collect(), truncated)
}

fn names(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|name| name.to_string()).collect()
}

pub fn input_datasets() -> Vec<DatasetColumns> {
    vec![
        DatasetColumns {
            dataset: FLAT_DATASET.to_string(),
            required: names(&FLAT_REQUIRED_COLUMNS),
            optional: names(&FLAT_OPTIONAL_COLUMNS),
        },
        DatasetColumns {
            dataset: INGESTED_DATASET.to_string(),
            required: names(&INGESTED_REQUIRED_COLUMNS),
            optional: names(&INGESTED_OPTIONAL_COLUMNS),
        },
    ]
}

pub fn output_tables() -> Vec<OutputTable> {
    vec![
        output_table("qa_diff", DIFF_FILE, &DIFF_COLUMNS),
        output_table("qa_summary", SUMMARY_FILE, &SUMMARY_COLUMNS),
        output_table(
            "qa_company_summary",
            COMPANY_SUMMARY_FILE,
            &COMPANY_SUMMARY_COLUMNS,
        ),
        output_table("qa_error_counts", ERROR_COUNTS_FILE, &ERROR_COUNT_COLUMNS),
        output_table("fout_records", "fout_records.csv", &FOUT_COLUMNS),
    ]
}

fn output_table(name: &str, file_name: &str, columns: &[&str]) -> OutputTable {
    OutputTable {
        name: name.to_string(),
        file_name: file_name.to_string(),
        columns: names(columns),
    }
}
