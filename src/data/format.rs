//! Value formatters for chart axes and exports.
//!
//! Each series gets a plain function value so charts never depend on
//! ambient locale state.

/// Formats one series value for display.
pub type ValueFormatter = fn(f64) -> String;

/// Format a number the way en-US number formatting does by default:
/// thousands grouped with `,`, at most three fraction digits, no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    // Ties round away from zero: 25.0625 -> 25.063
    let rounded = format!("{:.3}", (value.abs() * 1_000.0).round() / 1_000.0);
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
    // Values that round to zero print without a sign
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Temperature values, e.g. `26℃`.
pub fn celsius(value: f64) -> String {
    format!("{}℃", format_number(value))
}

/// Humidity values, e.g. `55%`.
pub fn percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_formatters() {
        assert_eq!(celsius(26.0), "26℃");
        assert_eq!(percent(55.0), "55%");
        assert_eq!(celsius(25.5), "25.5℃");
    }

    #[test]
    fn test_fraction_digits() {
        assert_eq!(format_number(25.5), "25.5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.23456), "1.235");
        assert_eq!(format_number(2.0), "2");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        // Sixteenth-degree sensor steps land exactly on a tie
        assert_eq!(format_number(25.0625), "25.063");
        assert_eq!(format_number(2.5625), "2.563");
        assert_eq!(format_number(-2.5625), "-2.563");
        assert_eq!(celsius(25.0625), "25.063℃");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(format_number(1_000.0), "1,000");
        assert_eq!(format_number(1_234.5678), "1,234.568");
        assert_eq!(format_number(1_000_000.0), "1,000,000");
        assert_eq!(format_number(999.0), "999");
    }

    #[test]
    fn test_sign() {
        assert_eq!(format_number(-3.5), "-3.5");
        assert_eq!(format_number(-1_500.0), "-1,500");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "∞");
        assert_eq!(format_number(f64::NEG_INFINITY), "-∞");
    }
}
