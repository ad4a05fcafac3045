use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{info, instrument};

use crate::contracts::types::{CompanySummaryRow, DiffEntry, ErrorCountRow, QaSummaryRow};
use crate::qa::diff::ErrorType;
use crate::qa::{PartitionKey, Prepared};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaSummaries {
    pub summary: QaSummaryRow,
    pub company_summaries: Vec<CompanySummaryRow>,
    pub error_counts: Vec<ErrorCountRow>,
}

#[derive(Debug, Default)]
struct Tally<'a> {
    raw_rows: usize,
    ingested_rows: usize,
    keys_in_both: usize,
    mismatched_keys: BTreeSet<PartitionKey>,
    cell_differences: usize,
    columns: BTreeSet<&'a str>,
    error_types: BTreeSet<&'static str>,
}

impl<'a> Tally<'a> {
    fn record(&mut self, entry: &'a DiffEntry, in_both: &BTreeSet<&PartitionKey>) {
        self.error_types.insert(entry.error_type.as_str());
        if !entry.error_type.is_field_level() {
            return;
        }
        self.cell_differences += 1;
        self.columns.insert(entry.column_name.as_str());
        let key = key_of(entry);
        if in_both.contains(&key) {
            self.mismatched_keys.insert(key);
        }
    }

    fn matched_rows(&self) -> usize {
        self.keys_in_both.saturating_sub(self.mismatched_keys.len())
    }

    fn into_summary(self, batch_id: &str, qa_run_datetime: &str) -> QaSummaryRow {
        QaSummaryRow {
            batch_id: batch_id.to_string(),
            qa_run_datetime: qa_run_datetime.to_string(),
            total_raw_rows: self.raw_rows,
            total_ingested_rows: self.ingested_rows,
            rows_with_keys_in_both: self.keys_in_both,
            total_rows_with_mismatches: self.mismatched_keys.len(),
            total_matched_rows: self.matched_rows(),
            total_cell_level_differences: self.cell_differences,
            columns_affected: join(&self.columns),
            error_types: join(&self.error_types),
        }
    }

    fn into_company_summary(
        self,
        organisation_cd: &str,
        batch_id: &str,
        qa_run_datetime: &str,
    ) -> CompanySummaryRow {
        let summary = self.into_summary(batch_id, qa_run_datetime);
        CompanySummaryRow {
            organisation_cd: organisation_cd.to_string(),
            batch_id: summary.batch_id,
            qa_run_datetime: summary.qa_run_datetime,
            total_raw_rows: summary.total_raw_rows,
            total_ingested_rows: summary.total_ingested_rows,
            rows_with_keys_in_both: summary.rows_with_keys_in_both,
            total_rows_with_mismatches: summary.total_rows_with_mismatches,
            total_matched_rows: summary.total_matched_rows,
            total_cell_level_differences: summary.total_cell_level_differences,
            columns_affected: summary.columns_affected,
            error_types: summary.error_types,
        }
    }
}

/// Rolls the diff ledger up into the global summary, one summary per
/// organisation present in either prepared dataset, and sparse
/// per-organisation error counts.
#[instrument(skip_all, fields(entries = diff.len()))]
pub fn build_qa_summaries<F, S>(
    flat_for_qa: &[Prepared<F>],
    sem_for_qa: &[Prepared<S>],
    in_both: &[PartitionKey],
    diff: &[DiffEntry],
    batch_id: &str,
    qa_run_datetime: &str,
) -> QaSummaries {
    let in_both_set = in_both.iter().collect::<BTreeSet<_>>();

    let mut overall = Tally {
        raw_rows: flat_for_qa.len(),
        ingested_rows: sem_for_qa.len(),
        keys_in_both: in_both_set.len(),
        ..Tally::default()
    };
    let mut by_org: BTreeMap<&str, Tally<'_>> = BTreeMap::new();

    for row in flat_for_qa {
        by_org.entry(row.key.organisation_cd.as_str()).or_default().raw_rows += 1;
    }
    for row in sem_for_qa {
        by_org.entry(row.key.organisation_cd.as_str()).or_default().ingested_rows += 1;
    }
    for key in &in_both_set {
        if let Some(tally) = by_org.get_mut(key.organisation_cd.as_str()) {
            tally.keys_in_both += 1;
        }
    }

    let mut counts: BTreeMap<(&str, &'static str), (ErrorType, usize)> =
        BTreeMap::new();
    for entry in diff {
        overall.record(entry, &in_both_set);
        if let Some(tally) = by_org.get_mut(entry.organisation_cd.as_str()) {
            tally.record(entry, &in_both_set);
        }
        counts
            .entry((entry.organisation_cd.as_str(), entry.error_type.as_str()))
            .or_insert((entry.error_type, 0))
            .1 += 1;
    }

    let company_summaries = by_org
        .into_iter()
        .map(|(org, tally)| tally.into_company_summary(org, batch_id, qa_run_datetime))
        .collect::<Vec<_>>();
    let error_counts = counts
        .into_iter()
        .map(|((org, _), (error_type, count))| ErrorCountRow {
            organisation_cd: org.to_string(),
            error_type,
            error_count: count,
            batch_id: batch_id.to_string(),
        })
        .collect::<Vec<_>>();
    let summary = overall.into_summary(batch_id, qa_run_datetime);

    info!(
        mismatched_rows = summary.total_rows_with_mismatches,
        organisations = company_summaries.len(),
        "built QA summaries"
    );
    QaSummaries {
        summary,
        company_summaries,
        error_counts,
    }
}

fn key_of(entry: &DiffEntry) -> PartitionKey {
    PartitionKey {
        organisation_cd: entry.organisation_cd.clone(),
        region_cd: entry.region_cd.clone().unwrap_or_default(),
        submission_period_cd: entry.submission_period_cd.clone().unwrap_or_default(),
        observation_period_cd: entry.observation_period_cd.clone().unwrap_or_default(),
        measure_key: entry.measure_key.clone().unwrap_or_default(),
    }
}

fn join(values: &BTreeSet<&str>) -> String {
    values.iter().copied().collect::<Vec<&str>>().join(",")
}
