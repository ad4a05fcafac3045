use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::metadata_or_missing;
use crate::contracts::types::DiffEntry;
use crate::qa::overlap::{KeyOverlap, first_row_index};
use crate::qa::records::MeasureRecord;
use crate::qa::value::{effective_decimals, parse_decimals, values_equivalent};
use crate::qa::{PartitionKey, Prepared};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    MissingInIngested,
    ExtraInIngested,
    MeasureValueMismatch,
    MeasureDecimalsMismatch,
    DescriptionMismatch,
    UnitDatatypeMismatch,
    CommentMismatch,
    ColumnMismatch,
    MissingCompanyFromFolder,
}

impl ErrorType {
    pub const ALL: [ErrorType; 9] = [
        Self::MissingInIngested,
        Self::ExtraInIngested,
        Self::MeasureValueMismatch,
        Self::MeasureDecimalsMismatch,
        Self::DescriptionMismatch,
        Self::UnitDatatypeMismatch,
        Self::CommentMismatch,
        Self::ColumnMismatch,
        Self::MissingCompanyFromFolder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingInIngested => "MISSING_IN_INGESTED",
            Self::ExtraInIngested => "EXTRA_IN_INGESTED",
            Self::MeasureValueMismatch => "MEASURE_VALUE_MISMATCH",
            Self::MeasureDecimalsMismatch => "MEASURE_DECIMALS_MISMATCH",
            Self::DescriptionMismatch => "DESCRIPTION_MISMATCH",
            Self::UnitDatatypeMismatch => "UNIT_DATATYPE_MISMATCH",
            Self::CommentMismatch => "COMMENT_MISMATCH",
            Self::ColumnMismatch => "COLUMN_MISMATCH",
            Self::MissingCompanyFromFolder => "MISSING_COMPANY_FROM_FOLDER",
        }
    }

    /// Field-level findings are the ones raised for keys present on both sides.
    pub fn is_field_level(self) -> bool {
        matches!(
            self,
            Self::MeasureValueMismatch
                | Self::MeasureDecimalsMismatch
                | Self::DescriptionMismatch
                | Self::UnitDatatypeMismatch
                | Self::CommentMismatch
                | Self::ColumnMismatch
        )
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for the missing-company pass. The pass runs only when both
/// `filenames` and `expected_orgs` are non-empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FolderCheck<'a> {
    pub filenames: &'a [String],
    pub expected_orgs: &'a [String],
    pub status: Option<&'a str>,
    pub process_cd: Option<&'a str>,
    pub submission_period_cd: Option<&'a str>,
    pub target_submission_period: Option<&'a str>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DiffOptions<'a> {
    pub batch_id: &'a str,
    pub qa_run_datetime: &'a str,
    pub folder: Option<FolderCheck<'a>>,
}

#[instrument(skip_all, fields(batch_id = options.batch_id))]
pub fn build_qa_diff<F, S>(
    flat_for_qa: &[Prepared<F>],
    sem_for_qa: &[Prepared<S>],
    overlap: &KeyOverlap,
    options: &DiffOptions<'_>,
) -> Vec<DiffEntry>
where
    F: MeasureRecord,
    S: MeasureRecord,
{
    let flat_index = first_row_index(flat_for_qa);
    let sem_index = first_row_index(sem_for_qa);
    let stamp = Stamp {
        batch_id: options.batch_id,
        qa_run_datetime: options.qa_run_datetime,
    };

    let mut ledger = Vec::new();

    for key in &overlap.only_raw {
        let Some(raw) = flat_index.get(key) else {
            continue;
        };
        ledger.push(stamp.entry(
            key,
            ErrorType::MissingInIngested,
            "Measure_Value",
            raw.measure_value().map(str::to_string),
            None,
            format!(
                "Measure {} is in the flat submission but missing from the ingested data.",
                key.measure_key
            ),
            raw.sheet_cd(),
        ));
    }
    debug!(count = overlap.only_raw.len(), "missing in ingested");

    for key in &overlap.only_sem {
        let Some(sem) = sem_index.get(key) else {
            continue;
        };
        ledger.push(stamp.entry(
            key,
            ErrorType::ExtraInIngested,
            "Measure_Value",
            None,
            sem.measure_value().map(str::to_string),
            format!(
                "Measure {} is in the ingested data but not in the flat submission.",
                key.measure_key
            ),
            sem.sheet_cd(),
        ));
    }
    debug!(count = overlap.only_sem.len(), "extra in ingested");

    let before_fields = ledger.len();
    for key in &overlap.in_both {
        let (Some(raw), Some(sem)) = (flat_index.get(key), sem_index.get(key)) else {
            continue;
        };
        compare_fields(&stamp, key, *raw, *sem, &mut ledger);
    }
    debug!(count = ledger.len() - before_fields, "field-level differences");

    if let Some(folder) = options.folder {
        let before_companies = ledger.len();
        missing_companies(&stamp, flat_for_qa, sem_for_qa, &folder, &mut ledger);
        debug!(
            count = ledger.len() - before_companies,
            "missing companies from folder"
        );
    }

    info!(entries = ledger.len(), "built QA diff ledger");
    ledger
}

struct Stamp<'a> {
    batch_id: &'a str,
    qa_run_datetime: &'a str,
}

impl Stamp<'_> {
    #[allow(clippy::too_many_arguments)]
    fn entry(
        &self,
        key: &PartitionKey,
        error_type: ErrorType,
        column_name: &str,
        raw_value: Option<String>,
        ingested_value: Option<String>,
        error_desc: String,
        sheet_cd: Option<&str>,
    ) -> DiffEntry {
        DiffEntry {
            batch_id: self.batch_id.to_string(),
            qa_run_datetime: self.qa_run_datetime.to_string(),
            organisation_cd: key.organisation_cd.clone(),
            region_cd: Some(key.region_cd.clone()),
            submission_period_cd: Some(key.submission_period_cd.clone()),
            observation_period_cd: Some(key.observation_period_cd.clone()),
            measure_key: Some(key.measure_key.clone()),
            error_type,
            column_name: column_name.to_string(),
            raw_value,
            ingested_value,
            error_desc,
            sheet_cd: sheet_cd.map(str::to_string),
        }
    }
}

fn compare_fields<F, S>(
    stamp: &Stamp<'_>,
    key: &PartitionKey,
    raw: &F,
    sem: &S,
    ledger: &mut Vec<DiffEntry>,
) where
    F: MeasureRecord,
    S: MeasureRecord,
{
    let sheet_cd = raw.sheet_cd().or(sem.sheet_cd());
    let raw_decimals = raw.decimals().and_then(parse_decimals);
    let sem_decimals = sem.decimals().and_then(parse_decimals);

    let values_agree = match (raw.measure_value(), sem.measure_value()) {
        (None, None) => true,
        (Some(left), Some(right)) => {
            values_equivalent(left, right, effective_decimals(raw_decimals, sem_decimals))
        }
        _ => false,
    };

    if !values_agree {
        ledger.push(stamp.entry(
            key,
            ErrorType::MeasureValueMismatch,
            "Measure_Value",
            raw.measure_value().map(str::to_string),
            sem.measure_value().map(str::to_string),
            format!(
                "Measure value differs: flat {} vs ingested {}.",
                display(raw.measure_value()),
                display(sem.measure_value())
            ),
            sheet_cd,
        ));
    } else if decimals_differ(raw.decimals(), sem.decimals()) {
        ledger.push(stamp.entry(
            key,
            ErrorType::MeasureDecimalsMismatch,
            "Measure_Decimals",
            raw.decimals().map(str::to_string),
            sem.decimals().map(str::to_string),
            format!(
                "Decimal places differ: flat {} vs ingested {}.",
                display(raw.decimals()),
                display(sem.decimals())
            ),
            sheet_cd,
        ));
    }

    if text_differs(raw.description(), sem.description()) {
        ledger.push(stamp.entry(
            key,
            ErrorType::DescriptionMismatch,
            "Measure_Desc",
            raw.description().map(str::to_string),
            sem.description().map(str::to_string),
            "Measure description differs from the ingested measure name.".to_string(),
            sheet_cd,
        ));
    }

    if text_differs(raw.unit(), sem.unit()) {
        ledger.push(stamp.entry(
            key,
            ErrorType::UnitDatatypeMismatch,
            "Measure_Unit",
            raw.unit().map(str::to_string),
            sem.unit().map(str::to_string),
            format!(
                "Unit differs: flat {} vs ingested {}.",
                display(raw.unit()),
                display(sem.unit())
            ),
            sheet_cd,
        ));
    }

    if let (Some(left), Some(right)) = (present(raw.comment()), present(sem.comment()))
        && left != right
    {
        ledger.push(stamp.entry(
            key,
            ErrorType::CommentMismatch,
            "Comment",
            raw.comment().map(str::to_string),
            sem.comment().map(str::to_string),
            "Comment differs between the flat submission and the ingested data.".to_string(),
            sheet_cd,
        ));
    }

    if let (Some(left), Some(right)) = (present(raw.sheet_cd()), present(sem.sheet_cd()))
        && left != right
    {
        ledger.push(column_mismatch(stamp, key, "Sheet_Cd", left, right, sheet_cd));
    }

    for (column, raw_text) in raw.extra() {
        let Some(sem_text) = sem.extra().get(column) else {
            continue;
        };
        if raw_text.trim() != sem_text.trim() {
            ledger.push(column_mismatch(
                stamp, key, column, raw_text, sem_text, sheet_cd,
            ));
        }
    }
}

fn column_mismatch(
    stamp: &Stamp<'_>,
    key: &PartitionKey,
    column: &str,
    raw_text: &str,
    sem_text: &str,
    sheet_cd: Option<&str>,
) -> DiffEntry {
    stamp.entry(
        key,
        ErrorType::ColumnMismatch,
        column,
        Some(raw_text.to_string()),
        Some(sem_text.to_string()),
        format!("Column {column} differs between the flat submission and the ingested data."),
        sheet_cd,
    )
}

fn missing_companies<F, S>(
    stamp: &Stamp<'_>,
    flat_for_qa: &[Prepared<F>],
    sem_for_qa: &[Prepared<S>],
    folder: &FolderCheck<'_>,
    ledger: &mut Vec<DiffEntry>,
) {
    if folder.filenames.is_empty() || folder.expected_orgs.is_empty() {
        return;
    }

    let present_orgs = flat_for_qa
        .iter()
        .map(|row| row.key.organisation_cd.as_str())
        .chain(sem_for_qa.iter().map(|row| row.key.organisation_cd.as_str()))
        .collect::<BTreeSet<&str>>();

    let status = metadata_or_missing(folder.status);
    let process_cd = metadata_or_missing(folder.process_cd);
    let submission_period_cd =
        metadata_or_missing(folder.submission_period_cd.or(folder.target_submission_period));

    let mut seen = BTreeSet::new();
    for org in folder.expected_orgs {
        let org = org.trim();
        if org.is_empty() || !seen.insert(org) || present_orgs.contains(org) {
            continue;
        }
        if folder.filenames.iter().any(|name| name.contains(org)) {
            continue;
        }

        ledger.push(DiffEntry {
            batch_id: stamp.batch_id.to_string(),
            qa_run_datetime: stamp.qa_run_datetime.to_string(),
            organisation_cd: org.to_string(),
            region_cd: None,
            submission_period_cd: Some(submission_period_cd.clone()),
            observation_period_cd: None,
            measure_key: None,
            error_type: ErrorType::MissingCompanyFromFolder,
            column_name: "Organisation_Cd".to_string(),
            raw_value: None,
            ingested_value: None,
            error_desc: format!(
                "Missing Company From Folder: no submission file found for {org} (status: {status}, process: {process_cd}, submission period: {submission_period_cd})."
            ),
            sheet_cd: None,
        });
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn text_differs(left: Option<&str>, right: Option<&str>) -> bool {
    present(left) != present(right)
}

fn decimals_differ(left: Option<&str>, right: Option<&str>) -> bool {
    let (Some(left), Some(right)) = (present(left), present(right)) else {
        return false;
    };
    match (parse_decimals(left), parse_decimals(right)) {
        (Some(left_count), Some(right_count)) => left_count != right_count,
        _ => left != right,
    }
}

fn display(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("'{text}'"),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorType, decimals_differ, text_differs};

    #[test]
    fn error_types_serialize_in_screaming_snake_case() {
        for error_type in ErrorType::ALL {
            let json = serde_json::to_value(error_type);
            assert!(json.is_ok());
            if let Ok(value) = json {
                assert_eq!(value, error_type.as_str());
            }
        }
    }

    #[test]
    fn only_keyed_comparisons_are_field_level() {
        assert!(ErrorType::CommentMismatch.is_field_level());
        assert!(ErrorType::ColumnMismatch.is_field_level());
        assert!(!ErrorType::MissingInIngested.is_field_level());
        assert!(!ErrorType::MissingCompanyFromFolder.is_field_level());
    }

    #[test]
    fn text_comparison_is_trimmed_and_case_sensitive() {
        assert!(!text_differs(Some(" Desc "), Some("Desc")));
        assert!(text_differs(Some("desc"), Some("Desc")));
        assert!(!text_differs(None, Some("  ")));
    }

    #[test]
    fn decimals_compare_numerically_when_possible() {
        assert!(!decimals_differ(Some("2"), Some("2.0")));
        assert!(decimals_differ(Some("2"), Some("3")));
        assert!(!decimals_differ(None, Some("3")));
    }
}
