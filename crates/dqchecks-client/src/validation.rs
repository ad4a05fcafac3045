use tracing::{debug, instrument};

use crate::ClientResult;
use crate::config::{ValidationMetadata, metadata_or_missing, new_event_id};
use crate::contracts::types::ValidationEvent;
use crate::table::Table;
use crate::workbook::is_filled;

pub const NULLS_IN_MEASURE_RULE: &str = "NULLS_IN_MEASURE_FIELDS";

const NULL_CHECK_COLUMNS: [&str; 5] = [
    "Measure_Cd",
    "Measure_Desc",
    "Measure_Unit",
    "Sheet_Cd",
    "Cell_Cd",
];

const MEASURE_FIELDS: [&str; 3] = ["Measure_Cd", "Measure_Desc", "Measure_Unit"];

/// Collects rows with a blank measure code, description or unit into one
/// validation event. Returns an empty list when every row is complete.
#[instrument(skip_all, fields(rows = table.len()))]
pub fn create_nulls_in_measure_validation_event(
    table: &Table,
    metadata: &ValidationMetadata,
) -> ClientResult<Vec<ValidationEvent>> {
    table.require_columns("measure extract", &NULL_CHECK_COLUMNS)?;

    let locations = (0..table.len())
        .filter(|row| {
            MEASURE_FIELDS
                .iter()
                .any(|column| !is_filled(table.value(*row, column)))
        })
        .map(|row| {
            format!(
                "{} -- {}",
                table.value(row, "Sheet_Cd").unwrap_or_default(),
                table.value(row, "Cell_Cd").unwrap_or_default()
            )
        })
        .collect::<Vec<String>>();
    debug!(offending_rows = locations.len(), "checked measure fields for nulls");

    if locations.is_empty() {
        return Ok(Vec::new());
    }

    Ok(vec![ValidationEvent {
        event_id: new_event_id(),
        batch_id: metadata_or_missing(metadata.batch_id.as_deref()),
        submission_period_cd: metadata_or_missing(metadata.submission_period_cd.as_deref()),
        process_cd: metadata_or_missing(metadata.process_cd.as_deref()),
        template_version: metadata_or_missing(metadata.template_version.as_deref()),
        organisation_cd: metadata_or_missing(metadata.organisation_cd.as_deref()),
        sheet_cd: metadata_or_missing(None),
        rule_cd: NULLS_IN_MEASURE_RULE.to_string(),
        error_category: "Missing Values".to_string(),
        error_severity_cd: "soft".to_string(),
        error_desc: format!(
            "Measure code, description or unit is blank at: {}",
            locations.join(", ")
        ),
    }])
}
