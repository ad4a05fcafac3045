use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

/// Wraps every successful command result.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub version: String,
    pub error: ErrorContract,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
}

pub fn success<T>(command: &str, data: T) -> ClientResult<SuccessEnvelope>
where
    T: Serialize,
{
    let json_data = serde_json::to_value(data)
        .map_err(|err| ClientError::internal_serialization(&err.to_string()))?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_string(),
        version: API_VERSION.to_string(),
        data: json_data,
    })
}

pub fn failure_from_error(error: &ClientError, command: Option<&str>) -> FailureEnvelope {
    FailureEnvelope {
        ok: false,
        command: command.map(str::to_string),
        version: API_VERSION.to_string(),
        error: ErrorContract {
            code: error.code.clone(),
            message: error.message.clone(),
            recovery_steps: error.recovery_steps.clone(),
        },
        data: error.data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{failure_from_error, success};
    use crate::ClientError;

    #[test]
    fn success_wraps_data_with_command_and_version() {
        let result = success("qa schema", json!({"key_cols": ["Organisation_Cd"]}));
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert!(envelope.ok);
            assert_eq!(envelope.command, "qa schema");
            assert_eq!(envelope.version, crate::API_VERSION);
            assert_eq!(envelope.data["key_cols"][0], "Organisation_Cd");
        }
    }

    #[test]
    fn failure_carries_error_data_and_command() {
        let error =
            ClientError::schema_mismatch("flat", vec!["Measure_Cd".to_string()], Vec::new());
        let envelope = failure_from_error(&error, Some("qa run"));
        let value = serde_json::to_value(&envelope).unwrap_or_default();

        assert_eq!(value["ok"], false);
        assert_eq!(value["command"], "qa run");
        assert_eq!(value["error"]["code"], "schema_mismatch");
        assert_eq!(value["data"]["missing_columns"][0], "Measure_Cd");
    }
}
