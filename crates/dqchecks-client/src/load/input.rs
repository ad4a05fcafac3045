use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;

use tracing::debug;

use crate::{ClientError, ClientResult};

pub(crate) fn read_source(
    dataset: &str,
    path: &str,
    stdin_override: Option<String>,
) -> ClientResult<String> {
    if path == "-" {
        let Some(body) = read_stdin(stdin_override)? else {
            return Err(ClientError::invalid_input(
                dataset,
                "Path `-` means stdin input, but stdin was empty. Pipe CSV/JSON input or pass a file path.",
            ));
        };
        debug!(dataset, bytes = body.len(), "read dataset from stdin");
        return Ok(body);
    }

    let body = fs::read_to_string(path)
        .map_err(|error| ClientError::source_read_failed(Path::new(path), &error.to_string()))?;
    debug!(dataset, path, bytes = body.len(), "read dataset from file");
    Ok(body)
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value).filter(|body| !body.trim().is_empty()));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| ClientError::source_read_failed(Path::new("-"), &error.to_string()))?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(buffer))
}
