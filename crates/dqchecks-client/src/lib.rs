pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
mod load;
pub mod qa;
pub mod report;
pub mod table;
pub mod validation;
pub mod workbook;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
