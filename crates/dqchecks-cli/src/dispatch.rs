use dqchecks_client::commands;
use dqchecks_client::config::RunConfig;
use dqchecks_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, QaCommand, QaRunArgs, ReshapeArgs};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Qa { command } => match command {
            QaCommand::Run(args) => run_qa(args),
            QaCommand::Schema { .. } => commands::schema::summary(),
        },
        Commands::Reshape(args) => run_reshape(args),
    }
}

/// Command name used in envelopes and failure output.
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Qa {
            command: QaCommand::Run(_),
        } => "qa run",
        Commands::Qa {
            command: QaCommand::Schema { .. },
        } => "qa schema",
        Commands::Reshape(_) => "reshape",
    }
}

fn run_qa(args: &QaRunArgs) -> ClientResult<SuccessEnvelope> {
    let overrides = RunConfig {
        batch_id: args.batch_id.clone(),
        target_submission_period: args.target_submission_period.clone(),
        target_org: args.target_org.clone(),
        process_cd: args.process_cd.clone(),
        status: args.status.clone(),
        submission_period_cd: args.submission_period_cd.clone(),
        template_version: None,
        expected_organisations: args.expected_orgs.clone(),
        filenames: args.filenames.clone(),
    };

    commands::qa::run_with_options(commands::qa::QaRunOptions {
        flat_path: args.flat.clone(),
        semantic_path: args.semantic.clone(),
        overrides,
        config_path: args.config.as_deref(),
        qa_run_datetime: args.qa_run_datetime.clone(),
        out_dir: args.out_dir.as_deref(),
        stdin_override: None,
    })
}

fn run_reshape(args: &ReshapeArgs) -> ClientResult<SuccessEnvelope> {
    commands::reshape::run_with_options(commands::reshape::ReshapeOptions {
        sheet_paths: args.sheets.clone(),
        organisation_cd: args.organisation_cd.clone(),
        submission_period_cd: args.submission_period_cd.clone(),
        process_cd: args.process_cd.clone(),
        template_version: args.template_version.clone(),
        last_modified: args.last_modified,
        out_path: args.out.as_deref(),
    })
}
