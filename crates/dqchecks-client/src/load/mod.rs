pub(crate) mod input;
pub(crate) mod parse;

use crate::ClientResult;
use crate::table::Table;

/// Reads one dataset from a path (`-` for stdin) and parses it into a table.
pub(crate) fn load_table(
    dataset: &str,
    path: &str,
    stdin_override: Option<String>,
) -> ClientResult<Table> {
    let content = input::read_source(dataset, path, stdin_override)?;
    parse::parse_table(dataset, &content)
}

/// Reads a headerless grid, used for sheet exports that carry banner rows.
pub(crate) fn load_grid(path: &str) -> ClientResult<Vec<Vec<Option<String>>>> {
    let content = input::read_source("sheet", path, None)?;
    parse::parse_grid(&content)
}
