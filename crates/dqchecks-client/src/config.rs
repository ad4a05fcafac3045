use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::{ClientError, ClientResult};

/// Sentinel written wherever run metadata was not supplied.
pub const MISSING_METADATA: &str = "--missing--";

pub fn metadata_or_missing(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => MISSING_METADATA.to_string(),
    }
}

pub fn new_batch_id() -> String {
    format!("batch_{}", Ulid::new())
}

pub fn new_event_id() -> String {
    format!("evt_{}", Ulid::new())
}

pub fn qa_run_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Run settings loaded from a JSON file. Every field is optional; CLI flags
/// override whatever the file provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub batch_id: Option<String>,
    pub target_submission_period: Option<String>,
    pub target_org: Option<String>,
    pub process_cd: Option<String>,
    pub status: Option<String>,
    pub submission_period_cd: Option<String>,
    pub template_version: Option<String>,
    pub expected_organisations: Vec<String>,
    pub filenames: Vec<String>,
}

impl RunConfig {
    pub fn merged_with(self, overrides: RunConfig) -> RunConfig {
        RunConfig {
            batch_id: overrides.batch_id.or(self.batch_id),
            target_submission_period: overrides
                .target_submission_period
                .or(self.target_submission_period),
            target_org: overrides.target_org.or(self.target_org),
            process_cd: overrides.process_cd.or(self.process_cd),
            status: overrides.status.or(self.status),
            submission_period_cd: overrides.submission_period_cd.or(self.submission_period_cd),
            template_version: overrides.template_version.or(self.template_version),
            expected_organisations: prefer_non_empty(
                overrides.expected_organisations,
                self.expected_organisations,
            ),
            filenames: prefer_non_empty(overrides.filenames, self.filenames),
        }
    }
}

fn prefer_non_empty(preferred: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

pub fn load_run_config(path: &Path) -> ClientResult<RunConfig> {
    let body = fs::read_to_string(path)
        .map_err(|error| ClientError::source_read_failed(path, &error.to_string()))?;
    serde_json::from_str::<RunConfig>(&body).map_err(|error| {
        ClientError::invalid_argument_with_recovery(
            &format!("Run config `{}` is not valid: {error}", path.display()),
            vec![
                "Provide a JSON object with keys such as `batch_id`, `process_cd` and `expected_organisations`.".to_string(),
                "Remove any keys the run config does not recognise.".to_string(),
            ],
        )
    })
}

/// Metadata stamped onto validation events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationMetadata {
    pub batch_id: Option<String>,
    pub submission_period_cd: Option<String>,
    pub process_cd: Option<String>,
    pub template_version: Option<String>,
    pub organisation_cd: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{MISSING_METADATA, RunConfig, load_run_config, metadata_or_missing, new_batch_id};

    #[test]
    fn blank_metadata_falls_back_to_sentinel() {
        assert_eq!(metadata_or_missing(None), MISSING_METADATA);
        assert_eq!(metadata_or_missing(Some("   ")), MISSING_METADATA);
        assert_eq!(metadata_or_missing(Some(" B1 ")), "B1");
    }

    #[test]
    fn batch_ids_are_prefixed_and_unique() {
        let first = new_batch_id();
        let second = new_batch_id();
        assert!(first.starts_with("batch_"));
        assert_ne!(first, second);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let file = RunConfig {
            batch_id: Some("from_file".to_string()),
            process_cd: Some("APR".to_string()),
            expected_organisations: vec!["ORG1".to_string()],
            ..RunConfig::default()
        };
        let flags = RunConfig {
            batch_id: Some("from_flag".to_string()),
            ..RunConfig::default()
        };

        let merged = file.merged_with(flags);
        assert_eq!(merged.batch_id.as_deref(), Some("from_flag"));
        assert_eq!(merged.process_cd.as_deref(), Some("APR"));
        assert_eq!(merged.expected_organisations, vec!["ORG1".to_string()]);
    }

    #[test]
    fn load_run_config_rejects_unknown_keys() {
        let dir = tempdir();
        assert!(dir.is_ok());
        if let Ok(dir) = dir {
            let path = dir.path().join("run.json");
            assert!(fs::write(&path, r#"{"batch": "x"}"#).is_ok());
            let result = load_run_config(&path);
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, "invalid_argument");
            }
        }
    }

    #[test]
    fn load_run_config_reads_lists() {
        let dir = tempdir();
        assert!(dir.is_ok());
        if let Ok(dir) = dir {
            let path = dir.path().join("run.json");
            let body = r#"{"status": "Submitted", "expected_organisations": ["ORG1", "ORG2"]}"#;
            assert!(fs::write(&path, body).is_ok());
            let result = load_run_config(&path);
            assert!(result.is_ok());
            if let Ok(config) = result {
                assert_eq!(config.status.as_deref(), Some("Submitted"));
                assert_eq!(config.expected_organisations.len(), 2);
                assert!(config.filenames.is_empty());
            }
        }
    }
}
