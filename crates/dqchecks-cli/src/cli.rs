use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| "timestamp must be RFC 3339, for example 2025-03-31T12:00:00Z".to_string())
}

fn parse_run_datetime(value: &str) -> Result<String, String> {
    parse_timestamp(value).map(|_| value.trim().to_string())
}

/// Extended help shown after `dqchecks qa run --help`.
pub const QA_RUN_AFTER_HELP: &str = "\
How a QA run works:
  Both extracts are filtered to the target submission period (and
  organisation, when given). Keys are normalized: blank regions become NA,
  trailing `.0` is stripped from period codes, measure references are trimmed.
  Rows are joined on Organisation_Cd, Region_Cd, Submission_Period_Cd,
  Observation_Period_Cd and Measure_Key.

  Accepted formats:
    CSV  - one header row with the column names
    JSON - one top-level array of objects

  Use `-` for at most one of the two paths to read it from stdin.

Run metadata:
  Flags win over `--config`; each flag also reads its DQCHECKS_* variable.
  Without a batch id one is generated as batch_<ULID>.
  `--expected-org` and `--filename` together enable the missing-company check.

What to do next:
  1. Run `dqchecks qa schema` to see required columns and report layouts.
  2. Run `dqchecks qa run <flat> <semantic> --target-submission-period <code>`.
  3. Add `--out-dir <dir>` to write the four report CSVs.
";

#[derive(Debug, Parser)]
#[command(
    name = "dqchecks",
    version,
    about = "data-quality reconciliation for regulatory submissions",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconcile a flat submission extract against ingested data
    #[command(arg_required_else_help = true)]
    Qa {
        #[command(subcommand)]
        command: QaCommand,
    },
    /// Unpivot fOut_ sheet exports into long-format measure records
    #[command(arg_required_else_help = true)]
    Reshape(ReshapeArgs),
}

#[derive(Debug, Subcommand)]
pub enum QaCommand {
    /// Run the reconciliation and report every difference
    #[command(arg_required_else_help = true, after_help = QA_RUN_AFTER_HELP)]
    Run(Box<QaRunArgs>),
    /// Show input columns, join keys and report layouts
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct QaRunArgs {
    /// Flat submission extract (CSV or JSON); `-` reads stdin
    pub flat: String,
    /// Ingested extract (CSV or JSON); `-` reads stdin
    pub semantic: String,
    /// Submission period to reconcile, for example 2025Q1
    #[arg(long, env = "DQCHECKS_TARGET_SUBMISSION_PERIOD")]
    pub target_submission_period: Option<String>,
    /// Restrict the run to one organisation
    #[arg(long, env = "DQCHECKS_TARGET_ORG")]
    pub target_org: Option<String>,
    #[arg(long, env = "DQCHECKS_BATCH_ID")]
    pub batch_id: Option<String>,
    #[arg(long, env = "DQCHECKS_PROCESS_CD")]
    pub process_cd: Option<String>,
    #[arg(long, env = "DQCHECKS_STATUS")]
    pub status: Option<String>,
    #[arg(long, env = "DQCHECKS_SUBMISSION_PERIOD_CD")]
    pub submission_period_cd: Option<String>,
    /// Organisation expected in the submission folder (repeat or comma-separate)
    #[arg(long = "expected-org", value_delimiter = ',')]
    pub expected_orgs: Vec<String>,
    /// Submission file seen in the folder (repeatable)
    #[arg(long = "filename")]
    pub filenames: Vec<String>,
    /// JSON run config; flags override its values
    #[arg(long, env = "DQCHECKS_CONFIG")]
    pub config: Option<PathBuf>,
    /// Directory for the report CSVs
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Fixed run timestamp (RFC 3339) instead of the current time
    #[arg(long, value_parser = parse_run_datetime)]
    pub qa_run_datetime: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ReshapeArgs {
    /// CSV export of each workbook sheet; the file stem is the sheet name
    #[arg(required = true)]
    pub sheets: Vec<String>,
    #[arg(long, env = "DQCHECKS_ORGANISATION_CD")]
    pub organisation_cd: String,
    #[arg(long, env = "DQCHECKS_SUBMISSION_PERIOD_CD")]
    pub submission_period_cd: String,
    #[arg(long, env = "DQCHECKS_PROCESS_CD")]
    pub process_cd: String,
    #[arg(long, env = "DQCHECKS_TEMPLATE_VERSION")]
    pub template_version: String,
    /// Submission timestamp (RFC 3339); defaults to the first export's mtime
    #[arg(long, value_parser = parse_timestamp)]
    pub last_modified: Option<DateTime<Utc>>,
    /// Write the long-format records to this CSV file
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
