//! Reconciliation of a flat submission extract against ingested data.
//!
//! Data flows strictly forward: [`prepare::prepare_qa_frames`] filters and
//! normalizes both sides, [`overlap::compute_key_overlap`] partitions the key
//! space, [`diff::build_qa_diff`] produces the ledger and
//! [`summary::build_qa_summaries`] rolls it up. [`run_qa`] chains all four.

pub mod diff;
pub mod normalize;
pub mod overlap;
pub mod prepare;
pub mod records;
pub mod summary;
pub mod value;

use serde::Serialize;
use tracing::{info, instrument};

use crate::contracts::types::DiffEntry;
use crate::qa::diff::{DiffOptions, FolderCheck, build_qa_diff};
use crate::qa::overlap::{KeyOverlap, compute_key_overlap};
use crate::qa::prepare::prepare_qa_frames;
use crate::qa::records::{FlatMeasureRow, IngestedMeasureRow};
use crate::qa::summary::{QaSummaries, build_qa_summaries};
use crate::{ClientError, ClientResult};

/// Columns that identify one measure observation on either side.
pub const KEY_COLS: [&str; 5] = [
    "Organisation_Cd",
    "Region_Cd",
    "Submission_Period_Cd",
    "Observation_Period_Cd",
    "Measure_Key",
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PartitionKey {
    #[serde(rename = "Organisation_Cd")]
    pub organisation_cd: String,
    #[serde(rename = "Region_Cd")]
    pub region_cd: String,
    #[serde(rename = "Submission_Period_Cd")]
    pub submission_period_cd: String,
    #[serde(rename = "Observation_Period_Cd")]
    pub observation_period_cd: String,
    #[serde(rename = "Measure_Key")]
    pub measure_key: String,
}

/// A normalized record paired with its join key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared<R> {
    pub key: PartitionKey,
    pub record: R,
}

pub type FlatForQa = Vec<Prepared<FlatMeasureRow>>;
pub type SemForQa = Vec<Prepared<IngestedMeasureRow>>;

#[derive(Debug, Default, Clone, Copy)]
pub struct QaSettings<'a> {
    pub target_submission_period: &'a str,
    pub target_org: Option<&'a str>,
    pub batch_id: &'a str,
    pub qa_run_datetime: &'a str,
    pub folder: Option<FolderCheck<'a>>,
}

/// Every intermediate product of one reconciliation run.
#[derive(Debug, Clone)]
pub struct QaReport {
    pub batch_id: String,
    pub qa_run_datetime: String,
    pub flat_for_qa: FlatForQa,
    pub sem_for_qa: SemForQa,
    pub overlap: KeyOverlap,
    pub diff: Vec<DiffEntry>,
    pub summaries: QaSummaries,
}

#[instrument(skip(flat, ingested, settings), fields(
    target_submission_period = settings.target_submission_period,
    batch_id = settings.batch_id,
))]
pub fn run_qa(
    flat: &[FlatMeasureRow],
    ingested: &[IngestedMeasureRow],
    settings: &QaSettings<'_>,
) -> ClientResult<QaReport> {
    if settings.target_submission_period.trim().is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "A target submission period is required.",
            Some("qa run"),
        ));
    }

    let (flat_for_qa, sem_for_qa) = prepare_qa_frames(
        flat,
        ingested,
        settings.target_submission_period,
        settings.target_org,
    );
    let overlap = compute_key_overlap(&flat_for_qa, &sem_for_qa);
    let diff = build_qa_diff(
        &flat_for_qa,
        &sem_for_qa,
        &overlap,
        &DiffOptions {
            batch_id: settings.batch_id,
            qa_run_datetime: settings.qa_run_datetime,
            folder: settings.folder,
        },
    );
    let summaries = build_qa_summaries(
        &flat_for_qa,
        &sem_for_qa,
        &overlap.in_both,
        &diff,
        settings.batch_id,
        settings.qa_run_datetime,
    );

    info!(
        diff_entries = diff.len(),
        matched_rows = summaries.summary.total_matched_rows,
        "QA run complete"
    );
    Ok(QaReport {
        batch_id: settings.batch_id.to_string(),
        qa_run_datetime: settings.qa_run_datetime.to_string(),
        flat_for_qa,
        sem_for_qa,
        overlap,
        diff,
        summaries,
    })
}
