//! Numeric helpers shared by every calculator.
//!
//! The engine never produces `NaN` or infinities from a degenerate input.
//! Every quotient goes through [`guarded_div`], which resolves a zero or
//! negative denominator to a zero result.

use log::warn;

/// Floating point type used throughout the calculators
pub type FloatValue = f64;

/// Divide `numerator` by `denominator`, returning 0 when the denominator is not
/// strictly positive.
pub fn guarded_div(numerator: FloatValue, denominator: FloatValue) -> FloatValue {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Round `value` to a fixed number of decimal places.
///
/// Halves round towards positive infinity, so -2.5 becomes -2. Values too
/// large to scale are returned unchanged. Only used when presenting numbers.
/// Intermediate results keep full precision.
pub fn round_to(value: FloatValue, decimals: u32) -> FloatValue {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    (scaled + 0.5).floor() / factor
}

/// Parse free text typed into an input field.
///
/// Leading whitespace is skipped and the longest leading decimal literal is
/// used, so `"3.4 kg"` reads as 3.4. Text with no leading number, or a number
/// that is not finite, becomes 0.
pub fn parse_lenient(raw: &str) -> FloatValue {
    let trimmed = raw.trim_start();
    let literal = &trimmed[..leading_literal_len(trimmed)];
    match literal.parse::<FloatValue>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!("Could not read a number from {:?}; using 0", raw);
            0.0
        }
    }
}

/// Length in bytes of the decimal literal at the start of `text`
fn leading_literal_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let integer_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - integer_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        digits += fraction_end - fraction_start;
        if digits > 0 {
            end = fraction_end;
        }
    }

    if digits == 0 {
        return 0;
    }

    // Only consume an exponent if it is followed by at least one digit
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+') | Some(b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_div_positive_denominator() {
        assert_eq!(guarded_div(170.0, 2.0), 85.0);
    }

    #[test]
    fn test_guarded_div_zero_and_negative_denominator() {
        assert_eq!(guarded_div(170.0, 0.0), 0.0);
        assert_eq!(guarded_div(170.0, -1.0), 0.0);
        assert_eq!(guarded_div(170.0, FloatValue::NAN), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.44099, 2), 1.44);
        assert_eq!(round_to(3469.81, 0), 3470.0);
        assert_eq!(round_to(0.675, 1), 0.7);
    }

    #[test]
    fn test_round_half_towards_positive_infinity() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(-2.6, 0), -3.0);
        assert_eq!(round_to(-0.125, 2), -0.12);
    }

    #[test]
    fn test_round_keeps_values_too_large_to_scale() {
        assert_eq!(round_to(1e299, 10), 1e299);
        assert_eq!(round_to(-1e300, 10), -1e300);
        assert!(round_to(FloatValue::MAX, 2).is_finite());
    }

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_lenient("3.4"), 3.4);
        assert_eq!(parse_lenient("  170"), 170.0);
        assert_eq!(parse_lenient("-2"), -2.0);
        assert_eq!(parse_lenient(".5"), 0.5);
        assert_eq!(parse_lenient("5."), 5.0);
        assert_eq!(parse_lenient("1e3"), 1000.0);
    }

    #[test]
    fn test_parse_leading_literal_only() {
        assert_eq!(parse_lenient("3.4 kg"), 3.4);
        assert_eq!(parse_lenient("12abc"), 12.0);
        assert_eq!(parse_lenient("2e"), 2.0);
        assert_eq!(parse_lenient("1.2.3"), 1.2);
    }

    #[test]
    fn test_parse_failures_become_zero() {
        assert_eq!(parse_lenient(""), 0.0);
        assert_eq!(parse_lenient("abc"), 0.0);
        assert_eq!(parse_lenient("-"), 0.0);
        assert_eq!(parse_lenient("."), 0.0);
        assert_eq!(parse_lenient("NaN"), 0.0);
        assert_eq!(parse_lenient("inf"), 0.0);
        assert_eq!(parse_lenient("1e999"), 0.0);
    }
}
