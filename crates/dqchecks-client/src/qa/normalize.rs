/// Written in place of a blank or absent region code.
pub const REGION_PLACEHOLDER: &str = "NA";

pub fn normalize_region_cd(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(region) if !region.is_empty() => region.to_string(),
        _ => REGION_PLACEHOLDER.to_string(),
    }
}

/// Removes the `.0` suffix that spreadsheet tooling appends to numeric period
/// codes (`202501.0` -> `202501`).
pub fn strip_float_suffix(value: &str) -> String {
    let trimmed = value.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

pub fn normalize_period_cd(value: Option<&str>) -> Option<String> {
    value.map(strip_float_suffix)
}

pub fn measure_key(reference: Option<&str>) -> String {
    reference.map(str::trim).unwrap_or_default().to_string()
}
