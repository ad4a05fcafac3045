use tracing::{debug, info, instrument};

use crate::qa::normalize::strip_float_suffix;
use crate::qa::records::{FlatMeasureRow, IngestedMeasureRow, MeasureRecord};
use crate::qa::{FlatForQa, Prepared, SemForQa};

/// Filters both extracts to the target submission period (and organisation,
/// when given) and normalizes their keys. Either side may come back empty.
#[instrument(skip(flat, ingested), fields(flat_in = flat.len(), ingested_in = ingested.len()))]
pub fn prepare_qa_frames(
    flat: &[FlatMeasureRow],
    ingested: &[IngestedMeasureRow],
    target_submission_period: &str,
    target_org: Option<&str>,
) -> (FlatForQa, SemForQa) {
    let target_period = strip_float_suffix(target_submission_period);
    let flat_for_qa = prepare_dataset(flat, &target_period, target_org);
    let sem_for_qa = prepare_dataset(ingested, &target_period, target_org);

    info!(
        flat_rows = flat_for_qa.len(),
        semantic_rows = sem_for_qa.len(),
        "prepared QA frames"
    );
    (flat_for_qa, sem_for_qa)
}

pub(crate) fn prepare_dataset<R: MeasureRecord>(
    rows: &[R],
    target_period: &str,
    target_org: Option<&str>,
) -> Vec<Prepared<R>> {
    let prepared = rows
        .iter()
        .filter(|row| {
            row.submission_period_cd()
                .map(strip_float_suffix)
                .is_some_and(|period| period == target_period)
        })
        .filter(|row| match target_org {
            Some(org) => row.organisation_cd() == Some(org),
            None => true,
        })
        .map(|row| {
            let record = row.clone().normalized();
            Prepared {
                key: record.partition_key(),
                record,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        kept = prepared.len(),
        dropped = rows.len() - prepared.len(),
        "filtered dataset"
    );
    prepared
}
