use std::collections::BTreeMap;

use crate::ClientResult;
use crate::qa::PartitionKey;
use crate::qa::normalize::{measure_key, normalize_period_cd, normalize_region_cd};
use crate::table::Table;

pub const FLAT_DATASET: &str = "flat";
pub const INGESTED_DATASET: &str = "semantic";

pub const FLAT_REQUIRED_COLUMNS: [&str; 8] = [
    "Organisation_Cd",
    "Submission_Period_Cd",
    "Observation_Period_Cd",
    "Measure_Cd",
    "Measure_Desc",
    "Measure_Unit",
    "Measure_Decimals",
    "Measure_Value",
];

pub const FLAT_OPTIONAL_COLUMNS: [&str; 3] = ["Region_Cd", "Sheet_Cd", "Comment"];

pub const INGESTED_REQUIRED_COLUMNS: [&str; 8] = [
    "Organisation_Cd",
    "Submission_Period_Cd",
    "Observation_Period_Cd",
    "Legacy_Measure_Reference",
    "Measure_Name",
    "Unit",
    "Decimal_Point",
    "Measure_Value",
];

pub const INGESTED_OPTIONAL_COLUMNS: [&str; 4] =
    ["Region_Cd", "Sheet_Cd", "Measure_Comment", "Insert_Date"];

/// Derived columns that are never carried through as comparable extras.
const DERIVED_COLUMNS: [&str; 1] = ["Measure_Key"];

/// Accessors shared by both sides of the reconciliation.
pub trait MeasureRecord: Clone {
    fn organisation_cd(&self) -> Option<&str>;
    fn region_cd(&self) -> Option<&str>;
    fn submission_period_cd(&self) -> Option<&str>;
    fn observation_period_cd(&self) -> Option<&str>;
    fn measure_reference(&self) -> Option<&str>;
    fn measure_value(&self) -> Option<&str>;
    fn decimals(&self) -> Option<&str>;
    fn description(&self) -> Option<&str>;
    fn unit(&self) -> Option<&str>;
    fn comment(&self) -> Option<&str>;
    fn sheet_cd(&self) -> Option<&str>;
    fn extra(&self) -> &BTreeMap<String, String>;

    fn with_normalized_keys(
        self,
        region_cd: String,
        submission_period_cd: Option<String>,
        observation_period_cd: Option<String>,
    ) -> Self;

    fn normalized(self) -> Self {
        let region_cd = normalize_region_cd(self.region_cd());
        let submission_period_cd = normalize_period_cd(self.submission_period_cd());
        let observation_period_cd = normalize_period_cd(self.observation_period_cd());
        self.with_normalized_keys(region_cd, submission_period_cd, observation_period_cd)
    }

    fn partition_key(&self) -> PartitionKey {
        PartitionKey {
            organisation_cd: self.organisation_cd().unwrap_or_default().trim().to_string(),
            region_cd: normalize_region_cd(self.region_cd()),
            submission_period_cd: normalize_period_cd(self.submission_period_cd())
                .unwrap_or_default(),
            observation_period_cd: normalize_period_cd(self.observation_period_cd())
                .unwrap_or_default(),
            measure_key: measure_key(self.measure_reference()),
        }
    }
}

/// A row of the as-submitted extract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatMeasureRow {
    pub organisation_cd: Option<String>,
    pub region_cd: Option<String>,
    pub submission_period_cd: Option<String>,
    pub observation_period_cd: Option<String>,
    pub measure_cd: Option<String>,
    pub measure_desc: Option<String>,
    pub measure_unit: Option<String>,
    pub measure_decimals: Option<String>,
    pub measure_value: Option<String>,
    pub sheet_cd: Option<String>,
    pub comment: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl FlatMeasureRow {
    pub fn from_table(table: &Table) -> ClientResult<Vec<Self>> {
        table.require_columns(FLAT_DATASET, &FLAT_REQUIRED_COLUMNS)?;

        let mut rows = Vec::with_capacity(table.len());
        for index in 0..table.len() {
            let cell = |name: &str| table.value(index, name).map(str::to_string);
            rows.push(Self {
                organisation_cd: cell("Organisation_Cd"),
                region_cd: cell("Region_Cd"),
                submission_period_cd: cell("Submission_Period_Cd"),
                observation_period_cd: cell("Observation_Period_Cd"),
                measure_cd: cell("Measure_Cd"),
                measure_desc: cell("Measure_Desc"),
                measure_unit: cell("Measure_Unit"),
                measure_decimals: cell("Measure_Decimals"),
                measure_value: cell("Measure_Value"),
                sheet_cd: cell("Sheet_Cd"),
                comment: cell("Comment"),
                extra: extra_cells(
                    table,
                    index,
                    &FLAT_REQUIRED_COLUMNS,
                    &FLAT_OPTIONAL_COLUMNS,
                ),
            });
        }
        Ok(rows)
    }
}

impl MeasureRecord for FlatMeasureRow {
    fn organisation_cd(&self) -> Option<&str> {
        self.organisation_cd.as_deref()
    }

    fn region_cd(&self) -> Option<&str> {
        self.region_cd.as_deref()
    }

    fn submission_period_cd(&self) -> Option<&str> {
        self.submission_period_cd.as_deref()
    }

    fn observation_period_cd(&self) -> Option<&str> {
        self.observation_period_cd.as_deref()
    }

    fn measure_reference(&self) -> Option<&str> {
        self.measure_cd.as_deref()
    }

    fn measure_value(&self) -> Option<&str> {
        self.measure_value.as_deref()
    }

    fn decimals(&self) -> Option<&str> {
        self.measure_decimals.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.measure_desc.as_deref()
    }

    fn unit(&self) -> Option<&str> {
        self.measure_unit.as_deref()
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn sheet_cd(&self) -> Option<&str> {
        self.sheet_cd.as_deref()
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    fn with_normalized_keys(
        self,
        region_cd: String,
        submission_period_cd: Option<String>,
        observation_period_cd: Option<String>,
    ) -> Self {
        Self {
            region_cd: Some(region_cd),
            submission_period_cd,
            observation_period_cd,
            measure_cd: self.measure_cd.as_deref().map(|value| measure_key(Some(value))),
            ..self
        }
    }
}

/// A row of the ingested (semantic) extract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestedMeasureRow {
    pub organisation_cd: Option<String>,
    pub region_cd: Option<String>,
    pub submission_period_cd: Option<String>,
    pub observation_period_cd: Option<String>,
    pub legacy_measure_reference: Option<String>,
    pub measure_name: Option<String>,
    pub unit: Option<String>,
    pub decimal_point: Option<String>,
    pub measure_value: Option<String>,
    pub sheet_cd: Option<String>,
    pub measure_comment: Option<String>,
    pub insert_date: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl IngestedMeasureRow {
    pub fn from_table(table: &Table) -> ClientResult<Vec<Self>> {
        table.require_columns(INGESTED_DATASET, &INGESTED_REQUIRED_COLUMNS)?;

        let mut rows = Vec::with_capacity(table.len());
        for index in 0..table.len() {
            let cell = |name: &str| table.value(index, name).map(str::to_string);
            rows.push(Self {
                organisation_cd: cell("Organisation_Cd"),
                region_cd: cell("Region_Cd"),
                submission_period_cd: cell("Submission_Period_Cd"),
                observation_period_cd: cell("Observation_Period_Cd"),
                legacy_measure_reference: cell("Legacy_Measure_Reference"),
                measure_name: cell("Measure_Name"),
                unit: cell("Unit"),
                decimal_point: cell("Decimal_Point"),
                measure_value: cell("Measure_Value"),
                sheet_cd: cell("Sheet_Cd"),
                measure_comment: cell("Measure_Comment"),
                insert_date: cell("Insert_Date"),
                extra: extra_cells(
                    table,
                    index,
                    &INGESTED_REQUIRED_COLUMNS,
                    &INGESTED_OPTIONAL_COLUMNS,
                ),
            });
        }
        Ok(rows)
    }
}

impl MeasureRecord for IngestedMeasureRow {
    fn organisation_cd(&self) -> Option<&str> {
        self.organisation_cd.as_deref()
    }

    fn region_cd(&self) -> Option<&str> {
        self.region_cd.as_deref()
    }

    fn submission_period_cd(&self) -> Option<&str> {
        self.submission_period_cd.as_deref()
    }

    fn observation_period_cd(&self) -> Option<&str> {
        self.observation_period_cd.as_deref()
    }

    fn measure_reference(&self) -> Option<&str> {
        self.legacy_measure_reference.as_deref()
    }

    fn measure_value(&self) -> Option<&str> {
        self.measure_value.as_deref()
    }

    fn decimals(&self) -> Option<&str> {
        self.decimal_point.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.measure_name.as_deref()
    }

    fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    fn comment(&self) -> Option<&str> {
        self.measure_comment.as_deref()
    }

    fn sheet_cd(&self) -> Option<&str> {
        self.sheet_cd.as_deref()
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    fn with_normalized_keys(
        self,
        region_cd: String,
        submission_period_cd: Option<String>,
        observation_period_cd: Option<String>,
    ) -> Self {
        Self {
            region_cd: Some(region_cd),
            submission_period_cd,
            observation_period_cd,
            legacy_measure_reference: self
                .legacy_measure_reference
                .as_deref()
                .map(|value| measure_key(Some(value))),
            ..self
        }
    }
}

fn extra_cells(
    table: &Table,
    row: usize,
    required: &[&str],
    optional: &[&str],
) -> BTreeMap<String, String> {
    table
        .columns
        .iter()
        .filter(|column| {
            let name = column.as_str();
            !required.contains(&name)
                && !optional.contains(&name)
                && !DERIVED_COLUMNS.contains(&name)
        })
        .filter_map(|column| {
            table
                .value(row, column)
                .map(|value| (column.clone(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{FlatMeasureRow, IngestedMeasureRow, MeasureRecord};
    use crate::table::Table;

    fn text(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn flat_rows_require_measure_columns() {
        let table = Table::with_columns(["Organisation_Cd", "Measure_Cd"]);
        let result = FlatMeasureRow::from_table(&table);

        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "schema_mismatch");
            assert!(error.message.contains("Submission_Period_Cd"));
            assert!(!error.message.contains("Region_Cd"));
        }
    }

    #[test]
    fn unknown_columns_are_kept_as_extras() {
        let mut table = Table::with_columns([
            "Organisation_Cd",
            "Submission_Period_Cd",
            "Observation_Period_Cd",
            "Legacy_Measure_Reference",
            "Measure_Name",
            "Unit",
            "Decimal_Point",
            "Measure_Value",
            "Process_Cd",
            "Measure_Key",
        ]);
        table.push_row(vec![
            text("ORG1"),
            text("2025Q1"),
            text("202501"),
            text("M1"),
            text("Desc"),
            text("%"),
            text("2"),
            text("10"),
            text("APR"),
            text("ignored"),
        ]);

        let result = IngestedMeasureRow::from_table(&table);
        assert!(result.is_ok());
        if let Ok(rows) = result {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].extra.get("Process_Cd").map(String::as_str), Some("APR"));
            assert!(!rows[0].extra.contains_key("Measure_Key"));
            assert_eq!(rows[0].measure_reference(), Some("M1"));
        }
    }

    #[test]
    fn normalized_rows_carry_canonical_keys() {
        let row = FlatMeasureRow {
            organisation_cd: text("ORG1"),
            region_cd: text("  "),
            submission_period_cd: text("2025.0"),
            observation_period_cd: text("202501.0"),
            measure_cd: text(" M1 "),
            ..FlatMeasureRow::default()
        };

        let normalized = row.normalized();
        assert_eq!(normalized.region_cd.as_deref(), Some("NA"));
        assert_eq!(normalized.submission_period_cd.as_deref(), Some("2025"));
        assert_eq!(normalized.observation_period_cd.as_deref(), Some("202501"));
        assert_eq!(normalized.measure_cd.as_deref(), Some("M1"));
        assert_eq!(normalized.clone().normalized(), normalized);

        let key = normalized.partition_key();
        assert_eq!(key.measure_key, "M1");
        assert_eq!(key.region_cd, "NA");
    }
}
