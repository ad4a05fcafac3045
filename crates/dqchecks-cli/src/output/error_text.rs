use dqchecks_client::ClientError;
use serde_json::Value;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    if let Some(missing) = missing_columns(error) {
        lines.push(format!("  Missing:  {}", missing.join(", ")));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

fn missing_columns(error: &ClientError) -> Option<Vec<&str>> {
    let columns = error
        .data
        .as_ref()?
        .get("missing_columns")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .collect::<Vec<&str>>();
    (!columns.is_empty()).then_some(columns)
}

#[cfg(test)]
mod tests {
    use dqchecks_client::ClientError;

    use super::render_error;

    #[test]
    fn renders_standard_error_layout() {
        let error = ClientError::invalid_argument_with_recovery(
            "bad input",
            vec!["run dqchecks --help".to_string()],
        );

        let rendered = render_error(&error);
        assert!(rendered.starts_with("Something went wrong, but it's easy to fix."));
        assert!(rendered.contains("  Error:    invalid_argument"));
        assert!(rendered.contains("  Details:  bad input"));
        assert!(rendered.contains("What to do next:"));
        assert!(rendered.contains("  1. run dqchecks --help"));
    }

    #[test]
    fn lists_missing_columns_for_schema_mismatch() {
        let error = ClientError::schema_mismatch(
            "flat",
            vec!["Measure_Cd".to_string(), "Measure_Value".to_string()],
            vec!["Organisation_Cd".to_string()],
        );

        let rendered = render_error(&error);
        assert!(rendered.contains("  Error:    schema_mismatch"));
        assert!(rendered.contains("  Missing:  Measure_Cd, Measure_Value"));
    }
}
