use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::contracts::types::{
    COMPANY_SUMMARY_COLUMNS, DIFF_COLUMNS, ERROR_COUNT_COLUMNS, ReportFile, SUMMARY_COLUMNS,
};
use crate::qa::QaReport;
use crate::{ClientError, ClientResult};

pub const DIFF_FILE: &str = "qa_diff.csv";
pub const SUMMARY_FILE: &str = "qa_summary.csv";
pub const COMPANY_SUMMARY_FILE: &str = "qa_company_summary.csv";
pub const ERROR_COUNTS_FILE: &str = "qa_error_counts.csv";

/// Writes a header row followed by one record per row. The header is
/// written even when `rows` is empty.
pub fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> ClientResult<usize> {
    let write_error = |detail: String| ClientError::output_write_failed(path, &detail);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|error| write_error(error.to_string()))?;
    writer
        .write_record(header)
        .map_err(|error| write_error(error.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|error| write_error(error.to_string()))?;
    }
    writer.flush().map_err(|error| write_error(error.to_string()))?;
    Ok(rows.len())
}

pub fn write_qa_reports(out_dir: &Path, report: &QaReport) -> ClientResult<Vec<ReportFile>> {
    fs::create_dir_all(out_dir)
        .map_err(|error| ClientError::output_write_failed(out_dir, &error.to_string()))?;

    let summaries = &report.summaries;
    let written = vec![
        write_report(out_dir, "qa_diff", DIFF_FILE, &DIFF_COLUMNS, &report.diff)?,
        write_report(
            out_dir,
            "qa_summary",
            SUMMARY_FILE,
            &SUMMARY_COLUMNS,
            std::slice::from_ref(&summaries.summary),
        )?,
        write_report(
            out_dir,
            "qa_company_summary",
            COMPANY_SUMMARY_FILE,
            &COMPANY_SUMMARY_COLUMNS,
            &summaries.company_summaries,
        )?,
        write_report(
            out_dir,
            "qa_error_counts",
            ERROR_COUNTS_FILE,
            &ERROR_COUNT_COLUMNS,
            &summaries.error_counts,
        )?,
    ];

    info!(out_dir = %out_dir.display(), files = written.len(), "wrote QA reports");
    Ok(written)
}

fn write_report<T: Serialize>(
    out_dir: &Path,
    table: &str,
    file_name: &str,
    header: &[&str],
    rows: &[T],
) -> ClientResult<ReportFile> {
    let path = out_dir.join(file_name);
    let count = write_csv(&path, header, rows)?;
    Ok(ReportFile {
        table: table.to_string(),
        path: path.display().to_string(),
        rows: count,
    })
}
