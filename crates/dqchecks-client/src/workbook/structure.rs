use std::collections::BTreeSet;

use tracing::debug;

use crate::config::{ValidationMetadata, metadata_or_missing, new_event_id};
use crate::contracts::types::ValidationEvent;
use crate::workbook::{CheckOutcome, Sheet, Workbook};

pub const MISSING_SHEET_RULE: &str = "MISSING_SHEET";

pub fn validate_tabs_between_spreadsheets(first: &Workbook, second: &Workbook) -> CheckOutcome {
    let (missing_in_first, missing_in_second) = missing_sheet_names(first, second);
    if missing_in_first.is_empty() && missing_in_second.is_empty() {
        return CheckOutcome::pass("Both spreadsheets have the same sheet names.");
    }

    let mut lines = Vec::new();
    if !missing_in_first.is_empty() {
        lines.push(format!(
            "Spreadsheet 1 is missing the following sheets: {}",
            missing_in_first.join(", ")
        ));
    }
    if !missing_in_second.is_empty() {
        lines.push(format!(
            "Spreadsheet 2 is missing the following sheets: {}",
            missing_in_second.join(", ")
        ));
    }
    CheckOutcome::fail(lines.join("\n"))
}

/// One validation event per template sheet absent from the company workbook.
pub fn find_missing_sheets(
    template: &Workbook,
    company: &Workbook,
    metadata: &ValidationMetadata,
) -> Vec<ValidationEvent> {
    let (_, missing_in_company) = missing_sheet_names(template, company);
    debug!(missing = missing_in_company.len(), "checked for missing sheets");

    missing_in_company
        .into_iter()
        .map(|sheet| ValidationEvent {
            event_id: new_event_id(),
            batch_id: metadata_or_missing(metadata.batch_id.as_deref()),
            submission_period_cd: metadata_or_missing(metadata.submission_period_cd.as_deref()),
            process_cd: metadata_or_missing(metadata.process_cd.as_deref()),
            template_version: metadata_or_missing(metadata.template_version.as_deref()),
            organisation_cd: metadata_or_missing(metadata.organisation_cd.as_deref()),
            sheet_cd: sheet.to_string(),
            rule_cd: MISSING_SHEET_RULE.to_string(),
            error_category: "Missing Sheet".to_string(),
            error_severity_cd: "hard".to_string(),
            error_desc: format!(
                "Sheet '{sheet}' is in the template but missing from the submission."
            ),
        })
        .collect()
}

pub fn check_sheet_structure(first: &Sheet, second: &Sheet) -> CheckOutcome {
    for sheet in [first, second] {
        if sheet.is_empty() {
            return CheckOutcome::fail(format!("Sheet '{}' is empty.", sheet.name));
        }
    }

    let (first_rows, first_columns) = first.dimensions();
    let (second_rows, second_columns) = second.dimensions();
    if (first_rows, first_columns) != (second_rows, second_columns) {
        return CheckOutcome::fail(format!(
            "Different number of rows/columns: '{}' has {first_rows} rows and {first_columns} columns, '{}' has {second_rows} rows and {second_columns} columns",
            first.name, second.name
        ));
    }

    let differences = (0..first_columns)
        .filter_map(|column| {
            let left = first.cell(0, column).unwrap_or_default();
            let right = second.cell(0, column).unwrap_or_default();
            (left != right).then(|| format!("Column {}: {left} != {right}", column + 1))
        })
        .collect::<Vec<String>>();
    if !differences.is_empty() {
        return CheckOutcome::fail(format!(
            "Columns are different: {}",
            differences.join(", ")
        ));
    }

    CheckOutcome::pass(format!(
        "Sheets '{}' and '{}' have the same structure.",
        first.name, second.name
    ))
}

/// Sorted names present in one workbook but not the other, as
/// (missing from `first`, missing from `second`).
fn missing_sheet_names<'a>(
    first: &'a Workbook,
    second: &'a Workbook,
) -> (Vec<&'a str>, Vec<&'a str>) {
    let first_names = first.sheet_names().into_iter().collect::<BTreeSet<&str>>();
    let second_names = second.sheet_names().into_iter().collect::<BTreeSet<&str>>();
    (
        second_names.difference(&first_names).copied().collect(),
        first_names.difference(&second_names).copied().collect(),
    )
}
