use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const QA_HELP_COMMAND: &str = "dqchecks qa run --help";
pub(crate) const SCHEMA_HELP_COMMAND: &str = "dqchecks qa schema";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `dqchecks {cmd} --help` for usage."),
            None => "Run `dqchecks --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    /// The source could not be read as a table at all.
    pub fn invalid_input(dataset: &str, message: &str) -> Self {
        Self::new(
            "invalid_input",
            message,
            vec![
                "Provide CSV with a header row or a top-level JSON array of objects.".to_string(),
                format!("Run `{SCHEMA_HELP_COMMAND}` to review the expected columns."),
            ],
        )
        .with_data(json!({
            "dataset": dataset,
            "supported_formats": ["csv", "json_array"],
        }))
    }

    pub fn schema_mismatch(
        dataset: &str,
        missing_columns: Vec<String>,
        actual_columns: Vec<String>,
    ) -> Self {
        Self::new(
            "schema_mismatch",
            &format!(
                "The {dataset} dataset is missing required columns: {}.",
                missing_columns.join(", ")
            ),
            vec![
                "Add the missing columns to the source extract.".to_string(),
                format!("Run `{SCHEMA_HELP_COMMAND}` to review required and optional columns."),
            ],
        )
        .with_data(json!({
            "dataset": dataset,
            "missing_columns": missing_columns,
            "actual_columns": actual_columns,
        }))
    }

    pub fn source_read_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "source_read_failed",
            &format!("Could not read `{location}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                format!("Run `{QA_HELP_COMMAND}` to confirm the expected arguments."),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn output_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "output_write_failed",
            &format!("Could not write `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or choose another output directory."
            )],
        )
    }

    pub fn reshape_failed(message: &str) -> Self {
        Self::new(
            "reshape_failed",
            message,
            vec![
                "Export each fOut_ sheet with the item header on its second row.".to_string(),
                "Name observation period columns like `2024-25`.".to_string(),
            ],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::ClientError;

    #[test]
    fn schema_mismatch_names_missing_columns() {
        let error = ClientError::schema_mismatch(
            "flat",
            vec!["Measure_Cd".to_string(), "Measure_Value".to_string()],
            vec!["Organisation_Cd".to_string()],
        );

        assert_eq!(error.code, "schema_mismatch");
        assert!(error.message.contains("Measure_Cd, Measure_Value"));
        let data = error.data.unwrap_or(Value::Null);
        assert_eq!(data["missing_columns"][0], "Measure_Cd");
        assert_eq!(data["dataset"], "flat");
    }

    #[test]
    fn command_hint_is_attached_when_known() {
        let error = ClientError::invalid_argument_for_command("bad", Some("qa run"));
        assert_eq!(error.recovery_steps[0], "Run `dqchecks qa run --help` for usage.");
        assert!(error.data.is_some());
    }
}
