use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::qa::records::FlatMeasureRow;
use crate::workbook::{Workbook, is_filled};
use crate::{ClientError, ClientResult};

pub const FOUT_SHEET_PREFIX: &str = "fOut_";

pub const FOUT_COLUMNS: [&str; 12] = [
    "Organisation_Cd",
    "Submission_Period_Cd",
    "Observation_Period_Cd",
    "Process_Cd",
    "Template_Version",
    "Sheet_Cd",
    "Measure_Cd",
    "Measure_Value",
    "Measure_Desc",
    "Measure_Unit",
    "Model_Cd",
    "Submission_Date",
];

const OBSERVATION_PERIOD_PATTERN: &str = r"^\s*2\d{3}-[1-9]\d\s*$";
const SUBMISSION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct ProcessingContext {
    pub organisation_cd: String,
    pub submission_period_cd: String,
    pub process_cd: String,
    pub template_version: String,
    pub last_modified: DateTime<Utc>,
}

impl ProcessingContext {
    fn validate(&self) -> ClientResult<()> {
        let fields = [
            ("organisation_cd", &self.organisation_cd),
            ("submission_period_cd", &self.submission_period_cd),
            ("process_cd", &self.process_cd),
            ("template_version", &self.template_version),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ClientError::invalid_argument_for_command(
                    &format!("The '{name}' argument must be a non-empty string."),
                    Some("reshape"),
                ));
            }
        }
        Ok(())
    }
}

/// One observation pulled out of a wide fOut_ sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoutRecord {
    #[serde(rename = "Organisation_Cd")]
    pub organisation_cd: String,
    #[serde(rename = "Submission_Period_Cd")]
    pub submission_period_cd: String,
    #[serde(rename = "Observation_Period_Cd")]
    pub observation_period_cd: String,
    #[serde(rename = "Process_Cd")]
    pub process_cd: String,
    #[serde(rename = "Template_Version")]
    pub template_version: String,
    #[serde(rename = "Sheet_Cd")]
    pub sheet_cd: String,
    #[serde(rename = "Measure_Cd")]
    pub measure_cd: Option<String>,
    #[serde(rename = "Measure_Value")]
    pub measure_value: Option<String>,
    #[serde(rename = "Measure_Desc")]
    pub measure_desc: Option<String>,
    #[serde(rename = "Measure_Unit")]
    pub measure_unit: Option<String>,
    #[serde(rename = "Model_Cd")]
    pub model_cd: Option<String>,
    #[serde(rename = "Submission_Date")]
    pub submission_date: String,
}

impl From<FoutRecord> for FlatMeasureRow {
    fn from(record: FoutRecord) -> Self {
        let mut extra = BTreeMap::new();
        extra.insert("Process_Cd".to_string(), record.process_cd);
        extra.insert("Template_Version".to_string(), record.template_version);
        extra.insert("Submission_Date".to_string(), record.submission_date);
        if let Some(model) = record.model_cd {
            extra.insert("Model_Cd".to_string(), model);
        }

        FlatMeasureRow {
            organisation_cd: Some(record.organisation_cd),
            region_cd: None,
            submission_period_cd: Some(record.submission_period_cd),
            observation_period_cd: Some(record.observation_period_cd),
            measure_cd: record.measure_cd,
            measure_desc: record.measure_desc,
            measure_unit: record.measure_unit,
            measure_decimals: None,
            measure_value: record.measure_value,
            sheet_cd: Some(record.sheet_cd),
            comment: None,
            extra,
        }
    }
}

/// Unpivots every `fOut_` sheet: row 1 is a banner, row 2 the header, and
/// each observation-period column of each data row becomes one record.
#[instrument(skip_all, fields(organisation_cd = %context.organisation_cd))]
pub fn process_fout_sheets(
    workbook: &Workbook,
    context: &ProcessingContext,
) -> ClientResult<Vec<FoutRecord>> {
    context.validate()?;

    let fout_sheets = workbook
        .sheets
        .iter()
        .filter(|sheet| sheet.name.starts_with(FOUT_SHEET_PREFIX))
        .collect::<Vec<_>>();
    if fout_sheets.is_empty() {
        return Err(ClientError::reshape_failed(&format!(
            "No fOut_* sheets found. Available sheets: {}",
            workbook.sheet_names().join(", ")
        )));
    }

    let pattern = Regex::new(OBSERVATION_PERIOD_PATTERN)
        .map_err(|error| ClientError::reshape_failed(&error.to_string()))?;
    let submission_date = context
        .last_modified
        .format(SUBMISSION_DATE_FORMAT)
        .to_string();

    let mut frames = Vec::with_capacity(fout_sheets.len());
    for sheet in fout_sheets {
        let header = header_names(sheet.rows.get(1).map(Vec::as_slice).unwrap_or_default());
        let data_rows = sheet
            .rows
            .iter()
            .skip(2)
            .filter(|row| row.iter().any(|cell| is_filled(cell.as_deref())))
            .collect::<Vec<_>>();
        if data_rows.is_empty() {
            return Err(ClientError::reshape_failed(&format!(
                "No valid data found after removing rows with NaN values in sheet '{}'.",
                sheet.name
            )));
        }
        frames.push((sheet, header, data_rows));
    }

    let mut records = Vec::new();
    for (sheet, header, data_rows) in frames {
        let period_columns = header
            .iter()
            .enumerate()
            .filter(|(_, name)| pattern.is_match(name))
            .map(|(index, name)| (index, name.trim().to_string()))
            .collect::<Vec<_>>();
        if period_columns.is_empty() {
            return Err(ClientError::reshape_failed(
                "No observation period columns found in the data.",
            ));
        }

        let column = |name: &str| header.iter().position(|candidate| candidate.trim() == name);
        let reference = column("Reference");
        let description = column("Item description");
        let unit = column("Unit");
        let model = column("Model");
        let value_at = |row: &[Option<String>], index: Option<usize>| {
            index.and_then(|position| row.get(position).cloned().flatten())
        };

        let before = records.len();
        for (period_index, period) in &period_columns {
            for row in &data_rows {
                let row = row.as_slice();
                records.push(FoutRecord {
                    organisation_cd: context.organisation_cd.clone(),
                    submission_period_cd: context.submission_period_cd.clone(),
                    observation_period_cd: period.clone(),
                    process_cd: context.process_cd.clone(),
                    template_version: context.template_version.clone(),
                    sheet_cd: sheet.name.clone(),
                    measure_cd: value_at(row, reference),
                    measure_value: value_at(row, Some(*period_index)),
                    measure_desc: value_at(row, description),
                    measure_unit: value_at(row, unit),
                    model_cd: value_at(row, model),
                    submission_date: submission_date.clone(),
                });
            }
        }
        debug!(
            sheet = %sheet.name,
            periods = period_columns.len(),
            records = records.len() - before,
            "unpivoted sheet"
        );
    }

    info!(records = records.len(), "reshaped fOut sheets");
    Ok(records)
}

fn header_names(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(index, cell)| match cell.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Unnamed: {index}"),
        })
        .collect()
}
