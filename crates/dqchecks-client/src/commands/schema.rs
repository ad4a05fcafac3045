use crate::ClientResult;
use crate::commands::common::{input_datasets, output_tables};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SchemaData;
use crate::qa::KEY_COLS;
use crate::qa::diff::ErrorType;

pub fn summary() -> ClientResult<SuccessEnvelope> {
    let data = SchemaData {
        key_cols: KEY_COLS.iter().map(|name| name.to_string()).collect(),
        inputs: input_datasets(),
        outputs: output_tables(),
        error_types: ErrorType::ALL
            .iter()
            .map(|error_type| error_type.as_str().to_string())
            .collect(),
    };
    success("qa schema", data)
}
