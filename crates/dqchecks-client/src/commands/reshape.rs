use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::commands::common::preview;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ReshapeData;
use crate::report::write_csv;
use crate::workbook::Workbook;
use crate::workbook::reshape::{
    FOUT_COLUMNS, FOUT_SHEET_PREFIX, ProcessingContext, process_fout_sheets,
};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct ReshapeOptions<'a> {
    /// CSV exports, one per sheet; each sheet takes its file stem as name.
    pub sheet_paths: Vec<String>,
    pub organisation_cd: String,
    pub submission_period_cd: String,
    pub process_cd: String,
    pub template_version: String,
    /// Defaults to the modification time of the first sheet export.
    pub last_modified: Option<DateTime<Utc>>,
    pub out_path: Option<&'a Path>,
}

#[doc(hidden)]
pub fn run_with_options(options: ReshapeOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if options.sheet_paths.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Pass at least one sheet export.",
            Some("reshape"),
        ));
    }

    let workbook = Workbook::from_csv_exports(&options.sheet_paths)?;
    let last_modified = match options.last_modified {
        Some(timestamp) => timestamp,
        None => modified_time(&options.sheet_paths[0])?,
    };
    let context = ProcessingContext {
        organisation_cd: options.organisation_cd,
        submission_period_cd: options.submission_period_cd,
        process_cd: options.process_cd,
        template_version: options.template_version,
        last_modified,
    };

    let records = process_fout_sheets(&workbook, &context)?;

    let output_path = match options.out_path {
        Some(path) => {
            write_csv(path, &FOUT_COLUMNS, &records)?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let (records_preview, records_truncated) = preview(&records);
    let data = ReshapeData {
        organisation_cd: context.organisation_cd,
        submission_period_cd: context.submission_period_cd,
        sheets_processed: workbook
            .sheet_names()
            .into_iter()
            .filter(|name| name.starts_with(FOUT_SHEET_PREFIX))
            .map(str::to_string)
            .collect(),
        records_total: records.len(),
        records_preview,
        records_truncated,
        output_path,
    };
    success("reshape", data)
}

fn modified_time(path: &str) -> ClientResult<DateTime<Utc>> {
    let modified = fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(|error| ClientError::source_read_failed(Path::new(path), &error.to_string()))?;
    let timestamp = DateTime::<Utc>::from(modified);
    debug!(path, %timestamp, "using sheet modification time as submission date");
    Ok(timestamp)
}
