use std::fs;
use std::path::{Path, PathBuf};

use dqchecks_client::qa::records::{FlatMeasureRow, IngestedMeasureRow};

pub const TARGET_PERIOD: &str = "2025Q1";
pub const RUN_DATETIME: &str = "2025-01-01T00:00:00Z";

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// A flat row in `2025Q1` / `202501` with a blank region.
pub fn flat(org: &str, measure: &str, value: &str, decimals: &str) -> FlatMeasureRow {
    FlatMeasureRow {
        organisation_cd: text(org),
        region_cd: text(""),
        submission_period_cd: text(TARGET_PERIOD),
        observation_period_cd: text("202501"),
        measure_cd: text(measure),
        measure_desc: Some(format!("Desc {measure}")),
        measure_unit: text("%"),
        measure_decimals: text(decimals),
        measure_value: text(value),
        sheet_cd: text("Sheet1"),
        ..FlatMeasureRow::default()
    }
}

pub fn ingested(org: &str, measure: &str, value: &str, decimals: &str) -> IngestedMeasureRow {
    IngestedMeasureRow {
        organisation_cd: text(org),
        region_cd: text(""),
        submission_period_cd: text(TARGET_PERIOD),
        observation_period_cd: text("202501"),
        legacy_measure_reference: text(measure),
        measure_name: Some(format!("Desc {measure}")),
        unit: text("%"),
        decimal_point: text(decimals),
        measure_value: text(value),
        sheet_cd: text("Sheet1"),
        ..IngestedMeasureRow::default()
    }
}

/// M1 matches, M2 differs in value, M3 is flat-only, M4 is ingested-only.
/// The last flat row belongs to another submission period.
pub fn missing_and_extra_inputs() -> (Vec<FlatMeasureRow>, Vec<IngestedMeasureRow>) {
    let mut other_period = flat("ORG1", "M4", "40%", "2");
    other_period.submission_period_cd = text("2024Q4");
    other_period.observation_period_cd = text("202401");

    (
        vec![
            flat("ORG1", "M1", "10%", "2"),
            flat("ORG1", "M2", "20%", "2"),
            flat("ORG1", "M3", "30%", "2"),
            other_period,
        ],
        vec![
            ingested("ORG1", "M1", "10", "2"),
            ingested("ORG1", "M2", "30", "2"),
            ingested("ORG1", "M4", "40", "2"),
        ],
    )
}

/// Two keys on each side; M2 differs in value.
pub fn summary_inputs() -> (Vec<FlatMeasureRow>, Vec<IngestedMeasureRow>) {
    (
        vec![
            flat("ORG1", "M1", "10%", "2"),
            flat("ORG1", "M2", "20%", "2"),
        ],
        vec![
            ingested("ORG1", "M1", "10", "2"),
            ingested("ORG1", "M2", "30", "2"),
        ],
    )
}

pub const FLAT_CSV: &str = "\
Organisation_Cd,Region_Cd,Submission_Period_Cd,Observation_Period_Cd,Measure_Cd,Measure_Desc,Measure_Unit,Measure_Decimals,Measure_Value,Sheet_Cd
ORG1,,2025Q1,202501.0,M1,Desc 1,%,2,10%,Sheet1
ORG1,,2025Q1,202501.0,M2,Desc 2,%,2,20%,Sheet1
ORG1,,2025Q1,202501.0,M3,Desc 3,%,2,30%,Sheet1
ORG1,,2024Q4,202401,M4,Desc 4,%,2,40%,Sheet1
";

pub const SEMANTIC_JSON: &str = r#"[
  {"Organisation_Cd": "ORG1", "Region_Cd": null, "Submission_Period_Cd": "2025Q1", "Observation_Period_Cd": "202501", "Legacy_Measure_Reference": "M1", "Measure_Name": "Desc 1", "Unit": "%", "Decimal_Point": 2, "Measure_Value": "10", "Sheet_Cd": "Sheet1", "Insert_Date": "2025-02-01"},
  {"Organisation_Cd": "ORG1", "Region_Cd": null, "Submission_Period_Cd": "2025Q1", "Observation_Period_Cd": "202501", "Legacy_Measure_Reference": "M2", "Measure_Name": "Desc 2", "Unit": "%", "Decimal_Point": 2, "Measure_Value": "30", "Sheet_Cd": "Sheet1", "Insert_Date": "2025-02-01"},
  {"Organisation_Cd": "ORG1", "Region_Cd": null, "Submission_Period_Cd": "2025Q1", "Observation_Period_Cd": "202501", "Legacy_Measure_Reference": "M4", "Measure_Name": "Desc 4", "Unit": "%", "Decimal_Point": 2, "Measure_Value": 40, "Sheet_Cd": "Sheet1", "Insert_Date": "2025-02-01"}
]"#;

pub fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let result = fs::write(&path, body);
    assert!(result.is_ok());
    path
}
