use std::io;

use dqchecks_client::contracts::envelope::failure_from_error;
use dqchecks_client::{ClientError, SuccessEnvelope};
use serde::Serialize;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &ClientError, command: Option<&str>) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error, command))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
