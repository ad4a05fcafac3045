use std::path::Path;

use tracing::{info, instrument};

use crate::commands::common::preview;
use crate::config::{RunConfig, load_run_config, new_batch_id, qa_run_timestamp};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{PartitionCounts, QaRunData};
use crate::load::load_table;
use crate::qa::diff::FolderCheck;
use crate::qa::records::{FLAT_DATASET, FlatMeasureRow, INGESTED_DATASET, IngestedMeasureRow};
use crate::qa::{QaSettings, run_qa};
use crate::report::write_qa_reports;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct QaRunOptions<'a> {
    pub flat_path: String,
    pub semantic_path: String,
    /// Values given on the command line; they win over the config file.
    pub overrides: RunConfig,
    pub config_path: Option<&'a Path>,
    pub qa_run_datetime: Option<String>,
    pub out_dir: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(
    flat_path: String,
    semantic_path: String,
    overrides: RunConfig,
) -> ClientResult<SuccessEnvelope> {
    run_with_options(QaRunOptions {
        flat_path,
        semantic_path,
        overrides,
        ..QaRunOptions::default()
    })
}

#[doc(hidden)]
#[instrument(skip_all, fields(flat = %options.flat_path, semantic = %options.semantic_path))]
pub fn run_with_options(options: QaRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if options.flat_path == "-" && options.semantic_path == "-" {
        return Err(ClientError::invalid_argument_for_command(
            "Only one of the flat and semantic inputs can be read from stdin.",
            Some("qa run"),
        ));
    }

    let file_config = match options.config_path {
        Some(path) => load_run_config(path)?,
        None => RunConfig::default(),
    };
    let config = file_config.merged_with(options.overrides);

    let Some(target_submission_period) = config
        .target_submission_period
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    else {
        return Err(ClientError::invalid_argument_for_command(
            "A target submission period is required. Pass --target-submission-period or set it in the run config.",
            Some("qa run"),
        ));
    };

    let batch_id = config.batch_id.clone().unwrap_or_else(new_batch_id);
    let qa_run_datetime = options.qa_run_datetime.unwrap_or_else(qa_run_timestamp);

    let flat_table = load_table(FLAT_DATASET, &options.flat_path, options.stdin_override.clone())?;
    let semantic_table =
        load_table(INGESTED_DATASET, &options.semantic_path, options.stdin_override)?;
    let flat = FlatMeasureRow::from_table(&flat_table)?;
    let ingested = IngestedMeasureRow::from_table(&semantic_table)?;
    info!(
        flat_rows = flat.len(),
        semantic_rows = ingested.len(),
        "loaded QA inputs"
    );

    let folder = (!config.filenames.is_empty() && !config.expected_organisations.is_empty())
        .then(|| FolderCheck {
            filenames: &config.filenames,
            expected_orgs: &config.expected_organisations,
            status: config.status.as_deref(),
            process_cd: config.process_cd.as_deref(),
            submission_period_cd: config.submission_period_cd.as_deref(),
            target_submission_period: Some(target_submission_period),
        });

    let report = run_qa(
        &flat,
        &ingested,
        &QaSettings {
            target_submission_period,
            target_org: config.target_org.as_deref(),
            batch_id: &batch_id,
            qa_run_datetime: &qa_run_datetime,
            folder,
        },
    )?;

    let reports = match options.out_dir {
        Some(out_dir) => write_qa_reports(out_dir, &report)?,
        None => Vec::new(),
    };

    let (diff_preview, diff_truncated) = preview(&report.diff);
    let data = QaRunData {
        batch_id: report.batch_id.clone(),
        qa_run_datetime: report.qa_run_datetime.clone(),
        target_submission_period: target_submission_period.to_string(),
        target_org: config.target_org.clone(),
        flat_rows: report.flat_for_qa.len(),
        semantic_rows: report.sem_for_qa.len(),
        partitions: PartitionCounts {
            only_raw: report.overlap.only_raw.len(),
            only_ingested: report.overlap.only_sem.len(),
            in_both: report.overlap.in_both.len(),
        },
        summary: report.summaries.summary,
        company_summaries: report.summaries.company_summaries,
        error_counts: report.summaries.error_counts,
        diff_total: report.diff.len(),
        diff_preview,
        diff_truncated,
        reports,
    };
    success("qa run", data)
}
