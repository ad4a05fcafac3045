use crate::cli::{Commands, QaCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Qa { command } => match command {
            QaCommand::Run(args) => OutputMode::from_flag(args.json),
            QaCommand::Schema { json } => OutputMode::from_flag(*json),
        },
        Commands::Reshape(args) => OutputMode::from_flag(args.json),
    }
}
