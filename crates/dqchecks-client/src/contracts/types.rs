use serde::{Deserialize, Serialize};

use crate::qa::diff::ErrorType;

pub const DIFF_COLUMNS: [&str; 13] = [
    "Batch_Id",
    "QA_Run_Datetime",
    "Organisation_Cd",
    "Region_Cd",
    "Submission_Period_Cd",
    "Observation_Period_Cd",
    "Measure_Key",
    "Error_Type",
    "Column_Name",
    "Raw_Value",
    "Ingested_Value",
    "Error_Desc",
    "Sheet_Cd",
];

pub const SUMMARY_COLUMNS: [&str; 10] = [
    "Batch_Id",
    "QA_Run_Datetime",
    "Total_Raw_Rows",
    "Total_Ingested_Rows",
    "Rows_With_Keys_In_Both",
    "Total_Rows_With_Mismatches",
    "Total_Matched_Rows",
    "Total_Cell_Level_Differences",
    "Columns_Affected",
    "Error_Types",
];

pub const COMPANY_SUMMARY_COLUMNS: [&str; 11] = [
    "Organisation_Cd",
    "Batch_Id",
    "QA_Run_Datetime",
    "Total_Raw_Rows",
    "Total_Ingested_Rows",
    "Rows_With_Keys_In_Both",
    "Total_Rows_With_Mismatches",
    "Total_Matched_Rows",
    "Total_Cell_Level_Differences",
    "Columns_Affected",
    "Error_Types",
];

pub const ERROR_COUNT_COLUMNS: [&str; 4] =
    ["Organisation_Cd", "Error_Type", "Error_Count", "Batch_Id"];

pub const VALIDATION_EVENT_COLUMNS: [&str; 11] = [
    "Event_Id",
    "Batch_Id",
    "Submission_Period_Cd",
    "Process_Cd",
    "Template_Version",
    "Organisation_Cd",
    "Sheet_Cd",
    "Rule_Cd",
    "Error_Category",
    "Error_Severity_Cd",
    "Error_Desc",
];

/// One finding in the QA diff ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    #[serde(rename = "Batch_Id")]
    pub batch_id: String,
    #[serde(rename = "QA_Run_Datetime")]
    pub qa_run_datetime: String,
    #[serde(rename = "Organisation_Cd")]
    pub organisation_cd: String,
    #[serde(rename = "Region_Cd")]
    pub region_cd: Option<String>,
    #[serde(rename = "Submission_Period_Cd")]
    pub submission_period_cd: Option<String>,
    #[serde(rename = "Observation_Period_Cd")]
    pub observation_period_cd: Option<String>,
    #[serde(rename = "Measure_Key")]
    pub measure_key: Option<String>,
    #[serde(rename = "Error_Type")]
    pub error_type: ErrorType,
    #[serde(rename = "Column_Name")]
    pub column_name: String,
    #[serde(rename = "Raw_Value")]
    pub raw_value: Option<String>,
    #[serde(rename = "Ingested_Value")]
    pub ingested_value: Option<String>,
    #[serde(rename = "Error_Desc")]
    pub error_desc: String,
    #[serde(rename = "Sheet_Cd")]
    pub sheet_cd: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaSummaryRow {
    #[serde(rename = "Batch_Id")]
    pub batch_id: String,
    #[serde(rename = "QA_Run_Datetime")]
    pub qa_run_datetime: String,
    #[serde(rename = "Total_Raw_Rows")]
    pub total_raw_rows: usize,
    #[serde(rename = "Total_Ingested_Rows")]
    pub total_ingested_rows: usize,
    #[serde(rename = "Rows_With_Keys_In_Both")]
    pub rows_with_keys_in_both: usize,
    #[serde(rename = "Total_Rows_With_Mismatches")]
    pub total_rows_with_mismatches: usize,
    #[serde(rename = "Total_Matched_Rows")]
    pub total_matched_rows: usize,
    #[serde(rename = "Total_Cell_Level_Differences")]
    pub total_cell_level_differences: usize,
    #[serde(rename = "Columns_Affected")]
    pub columns_affected: String,
    #[serde(rename = "Error_Types")]
    pub error_types: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanySummaryRow {
    #[serde(rename = "Organisation_Cd")]
    pub organisation_cd: String,
    #[serde(rename = "Batch_Id")]
    pub batch_id: String,
    #[serde(rename = "QA_Run_Datetime")]
    pub qa_run_datetime: String,
    #[serde(rename = "Total_Raw_Rows")]
    pub total_raw_rows: usize,
    #[serde(rename = "Total_Ingested_Rows")]
    pub total_ingested_rows: usize,
    #[serde(rename = "Rows_With_Keys_In_Both")]
    pub rows_with_keys_in_both: usize,
    #[serde(rename = "Total_Rows_With_Mismatches")]
    pub total_rows_with_mismatches: usize,
    #[serde(rename = "Total_Matched_Rows")]
    pub total_matched_rows: usize,
    #[serde(rename = "Total_Cell_Level_Differences")]
    pub total_cell_level_differences: usize,
    #[serde(rename = "Columns_Affected")]
    pub columns_affected: String,
    #[serde(rename = "Error_Types")]
    pub error_types: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorCountRow {
    #[serde(rename = "Organisation_Cd")]
    pub organisation_cd: String,
    #[serde(rename = "Error_Type")]
    pub error_type: ErrorType,
    #[serde(rename = "Error_Count")]
    pub error_count: usize,
    #[serde(rename = "Batch_Id")]
    pub batch_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationEvent {
    #[serde(rename = "Event_Id")]
    pub event_id: String,
    #[serde(rename = "Batch_Id")]
    pub batch_id: String,
    #[serde(rename = "Submission_Period_Cd")]
    pub submission_period_cd: String,
    #[serde(rename = "Process_Cd")]
    pub process_cd: String,
    #[serde(rename = "Template_Version")]
    pub template_version: String,
    #[serde(rename = "Organisation_Cd")]
    pub organisation_cd: String,
    #[serde(rename = "Sheet_Cd")]
    pub sheet_cd: String,
    #[serde(rename = "Rule_Cd")]
    pub rule_cd: String,
    #[serde(rename = "Error_Category")]
    pub error_category: String,
    #[serde(rename = "Error_Severity_Cd")]
    pub error_severity_cd: String,
    #[serde(rename = "Error_Desc")]
    pub error_desc: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartitionCounts {
    pub only_raw: usize,
    pub only_ingested: usize,
    pub in_both: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportFile {
    pub table: String,
    pub path: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QaRunData {
    pub batch_id: String,
    pub qa_run_datetime: String,
    pub target_submission_period: String,
    pub target_org: Option<String>,
    pub flat_rows: usize,
    pub semantic_rows: usize,
    pub partitions: PartitionCounts,
    pub summary: QaSummaryRow,
    pub company_summaries: Vec<CompanySummaryRow>,
    pub error_counts: Vec<ErrorCountRow>,
    pub diff_total: usize,
    pub diff_preview: Vec<DiffEntry>,
    pub diff_truncated: bool,
    pub reports: Vec<ReportFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetColumns {
    pub dataset: String,
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputTable {
    pub name: String,
    pub file_name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaData {
    pub key_cols: Vec<String>,
    pub inputs: Vec<DatasetColumns>,
    pub outputs: Vec<OutputTable>,
    pub error_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReshapeData {
    pub organisation_cd: String,
    pub submission_period_cd: String,
    pub sheets_processed: Vec<String>,
    pub records_total: usize,
    pub records_preview: Vec<crate::workbook::reshape::FoutRecord>,
    pub records_truncated: bool,
    pub output_path: Option<String>,
}
