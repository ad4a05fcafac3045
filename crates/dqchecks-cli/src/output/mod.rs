mod error_text;
mod format;
mod json;
mod mode;
mod qa_text;
mod reshape_text;
mod schema_text;

use std::io::{self, Write};

use dqchecks_client::{ClientError, SuccessEnvelope};

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(
    error: &ClientError,
    mode: OutputMode,
    command: Option<&str>,
) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error, command)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "qa run" => qa_text::render_qa_run(&success.data),
        "qa schema" => schema_text::render_schema(&success.data),
        "reshape" => reshape_text::render_reshape(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}

/// Writes to stdout, treating a closed pipe (`dqchecks ... | head`) as success.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    tolerate_broken_pipe(stdout.write_all(text.as_bytes()))?;
    tolerate_broken_pipe(stdout.flush())
}

fn write_stdout_line(text: &str) -> io::Result<()> {
    write_stdout_text(&format!("{text}\n"))
}

fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
