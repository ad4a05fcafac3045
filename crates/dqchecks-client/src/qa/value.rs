//! Numeric normalization for measure values.
//!
//! Flat values are display strings and may carry a `%` suffix (`"20%"`).
//! Ingested values are tried as stored first, then as a percentage numerator
//! scaled down by 100 against the flat fraction (`"12.5"` matches `"0.125"`
//! and `"12.5%"`). Comparison happens on the flat side's display scale and
//! treats two values as equal when they round to the same figure at the
//! lesser of the two stated decimal counts.

/// Relative tolerance used when neither side states a decimal count.
const UNSTATED_DECIMALS_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureNumber {
    pub value: f64,
    pub percent: bool,
}

/// Parses `" 1,234.5 "`, `"20%"` and `"-0.25"`. Non-finite and non-numeric
/// text yields `None`.
pub fn parse_measure_value(text: &str) -> Option<MeasureNumber> {
    let trimmed = text.trim();
    let (body, percent) = match trimmed.strip_suffix('%') {
        Some(body) => (body.trim_end(), true),
        None => (trimmed, false),
    };
    if body.is_empty() {
        return None;
    }

    let cleaned = body.replace(',', "");
    let value = cleaned.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(MeasureNumber { value, percent })
}

/// Parses a decimal count written as `"2"` or `"2.0"`.
pub fn parse_decimals(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if let Ok(count) = trimmed.parse::<u32>() {
        return Some(count);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        return Some(value as u32);
    }
    None
}

pub fn effective_decimals(raw: Option<u32>, ingested: Option<u32>) -> Option<u32> {
    match (raw, ingested) {
        (Some(left), Some(right)) => Some(left.min(right)),
        (Some(count), None) | (None, Some(count)) => Some(count),
        (None, None) => None,
    }
}

/// Decides whether a flat value and an ingested value describe the same
/// figure. Falls back to a trimmed text comparison when either side is not
/// numeric.
pub fn values_equivalent(raw: &str, ingested: &str, decimals: Option<u32>) -> bool {
    let (Some(raw_number), Some(ingested_number)) =
        (parse_measure_value(raw), parse_measure_value(ingested))
    else {
        return raw.trim() == ingested.trim();
    };

    candidates_on_raw_scale(raw_number, ingested_number)
        .into_iter()
        .any(|candidate| within_rounding(raw_number.value, candidate, decimals))
}

/// The ingested value as stored, then as a numerator over 100. A `%` flat
/// value is already a numerator, so the second candidate moves the other way.
fn candidates_on_raw_scale(raw: MeasureNumber, ingested: MeasureNumber) -> [f64; 2] {
    if raw.percent {
        [ingested.value, ingested.value * 100.0]
    } else {
        [ingested.value, ingested.value / 100.0]
    }
}

fn within_rounding(left: f64, right: f64, decimals: Option<u32>) -> bool {
    let difference = (left - right).abs();
    match decimals {
        Some(count) => {
            let half_unit = 0.5 * 10f64.powi(-(count.min(15) as i32));
            difference <= half_unit * (1.0 + 1e-9)
        }
        None => {
            let scale = left.abs().max(right.abs()).max(1.0);
            difference <= UNSTATED_DECIMALS_TOLERANCE * scale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{effective_decimals, parse_decimals, parse_measure_value, values_equivalent};

    #[test]
    fn parses_percent_and_grouped_values() {
        let parsed = parse_measure_value(" 20% ");
        assert_eq!(parsed.map(|number| number.value), Some(20.0));
        assert_eq!(parsed.map(|number| number.percent), Some(true));
        assert_eq!(
            parse_measure_value("1,234.5").map(|number| number.value),
            Some(1234.5)
        );
        assert!(parse_measure_value("n/a").is_none());
        assert!(parse_measure_value("%").is_none());
        assert!(parse_measure_value("inf").is_none());
    }

    #[test]
    fn decimals_accept_float_text() {
        assert_eq!(parse_decimals("2"), Some(2));
        assert_eq!(parse_decimals("3.0"), Some(3));
        assert_eq!(parse_decimals("2.5"), None);
        assert_eq!(parse_decimals("-1"), None);
        assert_eq!(effective_decimals(Some(2), Some(3)), Some(2));
        assert_eq!(effective_decimals(None, Some(3)), Some(3));
    }

    #[test]
    fn percent_numerator_matches_display_value() {
        assert!(values_equivalent("10%", "10", Some(2)));
        assert!(values_equivalent("10%", "10.0", Some(2)));
        assert!(!values_equivalent("20%", "30", Some(2)));
    }

    #[test]
    fn percent_fraction_matches_display_value() {
        assert!(values_equivalent("12.5%", "0.125", Some(1)));
    }

    #[test]
    fn ingested_numerator_matches_unsuffixed_fraction() {
        assert!(values_equivalent("0.125", "12.5", Some(3)));
        assert!(values_equivalent("1", "100", Some(2)));
        assert!(values_equivalent("12.5", "12.5", Some(1)));
        assert!(!values_equivalent("0.125", "13", Some(3)));
    }

    #[test]
    fn rounding_uses_stated_decimals() {
        assert!(values_equivalent("1.23", "1.2349", Some(2)));
        assert!(!values_equivalent("1.23", "1.236", Some(2)));
        assert!(values_equivalent("100", "100.4", Some(0)));
        assert!(!values_equivalent("100", "100.4", None));
    }

    #[test]
    fn non_numeric_values_compare_as_text() {
        assert!(values_equivalent(" Yes ", "Yes", Some(0)));
        assert!(!values_equivalent("Yes", "No", Some(0)));
        assert!(!values_equivalent("10", "ten", None));
    }
}
