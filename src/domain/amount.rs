//! String-level helpers for raw amount text.
//!
//! Amounts stay as the text the user typed. Numeric interpretation happens only
//! at comparison time, and precision checks never go through a float.

/// Maximum fractional digits accepted for any token amount.
pub const MAX_DECIMAL_PLACES: usize = 18;

/// Whether the fractional part of `amount` has at most `max` digits.
///
/// Text without a decimal point always passes.
pub fn has_valid_decimal_places(amount: &str, max: usize) -> bool {
    match amount.split('.').nth(1) {
        Some(fraction) => fraction.chars().count() <= max,
        None => true,
    }
}

/// Parse the longest numeric prefix of `text` as a float.
///
/// Leading whitespace is skipped and trailing garbage is ignored, so `"1.5abc"`
/// parses as `1.5`. Text with no numeric prefix yields NaN, which compares
/// false against everything.
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return f64::NAN;
    }

    // Exponent is only consumed when it has at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Drop every character outside `[0-9.]`.
pub fn filter_amount_chars(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Insert thousands separators into the integer part of a decimal string.
pub fn format_with_commas(value: &str) -> String {
    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_places_boundary() {
        for digits in 0..=MAX_DECIMAL_PLACES {
            let amount = format!("1.{}", "1".repeat(digits));
            assert!(
                has_valid_decimal_places(&amount, MAX_DECIMAL_PLACES),
                "{amount} should be valid"
            );
        }
        for digits in (MAX_DECIMAL_PLACES + 1)..30 {
            let amount = format!("0.{}", "9".repeat(digits));
            assert!(
                !has_valid_decimal_places(&amount, MAX_DECIMAL_PLACES),
                "{amount} should be invalid"
            );
        }
    }

    #[test]
    fn test_decimal_places_is_string_level() {
        // 19 fractional digits, even though the trailing zero adds no value.
        assert!(!has_valid_decimal_places("1.2345678901234567890", 18));
        assert!(has_valid_decimal_places("100", 18));
        assert!(has_valid_decimal_places("100.", 18));
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float("10.0"), 10.0);
        assert_eq!(parse_float("  2.5"), 2.5);
        assert_eq!(parse_float("1.2.3"), 1.2);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("5."), 5.0);
        assert_eq!(parse_float("-3"), -3.0);
        assert_eq!(parse_float("1e3"), 1000.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("7abc"), 7.0);
    }

    #[test]
    fn test_parse_float_nan() {
        assert!(parse_float("").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("abc").is_nan());
        assert!(parse_float("-").is_nan());
    }

    #[test]
    fn test_filter_amount_chars() {
        assert_eq!(filter_amount_chars("1,000.5 THETA"), "1000.5");
        assert_eq!(filter_amount_chars("-12"), "12");
        assert_eq!(filter_amount_chars("abc"), "");
    }

    #[test]
    fn test_format_with_commas() {
        assert_eq!(format_with_commas("2000000"), "2,000,000");
        assert_eq!(format_with_commas("1000"), "1,000");
        assert_eq!(format_with_commas("999"), "999");
        assert_eq!(format_with_commas("1234567.891"), "1,234,567.891");
        assert_eq!(format_with_commas("-1000"), "-1,000");
    }
}
