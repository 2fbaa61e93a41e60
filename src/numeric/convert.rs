use std::error::Error;
use std::fmt;

/// Upper bound on rendered fraction digits, so repeating fractions
/// terminate.
pub const MAX_FRACTION_DIGITS: usize = 10;

const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub type Result<T> = std::result::Result<T, BaseError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseError {
    InvalidRadix(u32),
    InvalidDigit(char),
    NonFinite(f64),
}

impl fmt::Display for BaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseError::InvalidRadix(radix) => {
                write!(f, "radix `{}` not in 2..=36", radix)
            }
            BaseError::InvalidDigit(ch) => {
                write!(f, "digit `{}` not valid in the target base", ch)
            }
            BaseError::NonFinite(value) => {
                write!(f, "`{}` cannot be rendered in a positional base", value)
            }
        }
    }
}

impl Error for BaseError {}

fn check_radix(radix: u32) -> Result<()> {
    if radix < 2 || radix > 36 {
        return Err(BaseError::InvalidRadix(radix));
    }
    Ok(())
}

// Digit alphabet is 0-9A-Z, case-insensitive on the way in.
fn digit_value(ch: char) -> Option<i64> {
    let ch = ch.to_ascii_uppercase();
    DIGITS
        .iter()
        .position(|&digit| digit as char == ch)
        .map(|position| position as i64)
}

/// Reads a digit string in `radix` as a 64-bit integer. A leading `-`
/// denotes sign; an empty string reads as zero. Digits outside the radix
/// fail unless `forgive` skips them.
pub fn from_base(text: &str, radix: u32, forgive: bool) -> Result<i64> {
    check_radix(radix)?;

    if text.is_empty() {
        return Ok(0);
    }

    let negative = text.starts_with('-');
    let digits = if negative { &text[1..] } else { text };

    let mut value: i64 = 0;
    for ch in digits.chars() {
        let digit = match digit_value(ch) {
            Some(digit) if digit < i64::from(radix) => digit,
            _ => {
                if forgive {
                    continue;
                }
                return Err(BaseError::InvalidDigit(ch));
            }
        };
        value = value.wrapping_mul(i64::from(radix)).wrapping_add(digit);
    }

    Ok(if negative { value.wrapping_neg() } else { value })
}

/// Reads a digit string with an optional single `.` fraction as a double.
pub fn decimal_from_base(text: &str, radix: u32) -> Result<f64> {
    check_radix(radix)?;

    let mut parts = text.splitn(2, '.');
    let integer_text = parts.next().unwrap_or("");
    let fraction_text = match parts.next() {
        Some(fraction) => fraction,
        None => return Ok(from_base(text, radix, false)? as f64),
    };

    let negative = integer_text.starts_with('-');
    let integer = from_base(integer_text, radix, false)?;

    let mut fraction = 0.0;
    for (position, ch) in fraction_text.chars().enumerate() {
        let digit = match digit_value(ch) {
            Some(digit) if digit < i64::from(radix) => digit,
            _ => return Err(BaseError::InvalidDigit(ch)),
        };
        fraction += digit as f64 / f64::from(radix).powi(position as i32 + 1);
    }

    Ok(integer as f64 + if negative { -fraction } else { fraction })
}

/// Renders a 64-bit integer as a digit string in `radix`.
pub fn to_base(value: i64, radix: u32) -> Result<String> {
    check_radix(radix)?;

    if value == 0 {
        return Ok("0".to_string());
    }

    // Work in i128 so i64::MIN has an absolute value.
    let mut quotient = (value as i128).abs();
    let mut digits = Vec::new();

    while quotient > 0 {
        let digit = (quotient % i128::from(radix)) as usize;
        digits.push(DIGITS[digit] as char);
        quotient /= i128::from(radix);
    }

    if value < 0 {
        digits.push('-');
    }

    Ok(digits.iter().rev().collect())
}

/// Renders a double as a digit string in `radix`, with at most
/// `max_fraction_digits` digits after the point.
pub fn decimal_to_base(value: f64, radix: u32, max_fraction_digits: usize) -> Result<String> {
    check_radix(radix)?;

    if !value.is_finite() {
        return Err(BaseError::NonFinite(value));
    }

    if value == 0.0 {
        return Ok("0".to_string());
    }

    let magnitude = value.abs();
    let integer_part = magnitude.floor();
    let mut rendered = to_base(integer_part as i64, radix)?;

    let mut fraction = magnitude - integer_part;
    if fraction > 0.0 {
        rendered.push('.');
        let mut count = 0;
        while fraction > 0.0 && count < max_fraction_digits {
            fraction *= f64::from(radix);
            let digit = fraction.floor();
            rendered.push(DIGITS[digit as usize] as char);
            fraction -= digit;
            count += 1;
        }
    }

    Ok(if value < 0.0 {
        format!("-{}", rendered)
    } else {
        rendered
    })
}

/// Converts an integer digit string between two bases.
pub fn rebase(text: &str, from: u32, to: u32) -> Result<String> {
    to_base(from_base(text, from, false)?, to)
}

/// Converts a digit string with an optional fraction between two bases.
pub fn decimal_rebase(text: &str, from: u32, to: u32) -> Result<String> {
    decimal_to_base(decimal_from_base(text, from)?, to, MAX_FRACTION_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;

    #[test_case("0", 10, 0 ; "zero")]
    #[test_case("255", 10, 255 ; "decimal")]
    #[test_case("FF", 16, 255 ; "hex upper")]
    #[test_case("ff", 16, 255 ; "hex lower")]
    #[test_case("1010", 2, 10 ; "binary")]
    #[test_case("Z", 36, 35 ; "base36")]
    #[test_case("-FF", 16, -255 ; "negative")]
    #[test_case("", 10, 0 ; "empty")]
    fn reads_digit_strings(text: &str, radix: u32, expected: i64) {
        assert_eq!(from_base(text, radix, false).unwrap(), expected)
    }

    #[test]
    fn rejects_invalid_digits() {
        assert_eq!(
            from_base("12G", 16, false).unwrap_err(),
            BaseError::InvalidDigit('G')
        );
        assert_eq!(
            from_base("2", 2, false).unwrap_err(),
            BaseError::InvalidDigit('2')
        );
    }

    #[test]
    fn forgives_invalid_digits_on_request() {
        assert_eq!(from_base("1_0", 10, true).unwrap(), 10);
        assert_eq!(from_base("FxF", 16, true).unwrap(), 255);
    }

    #[test]
    fn rejects_bad_radix() {
        assert_eq!(from_base("1", 1, false).unwrap_err(), BaseError::InvalidRadix(1));
        assert_eq!(to_base(1, 37).unwrap_err(), BaseError::InvalidRadix(37));
    }

    #[test_case(0, 16, "0" ; "zero")]
    #[test_case(255, 16, "FF" ; "hex")]
    #[test_case(10, 2, "1010" ; "binary")]
    #[test_case(35, 36, "Z" ; "base36")]
    #[test_case(-255, 16, "-FF" ; "negative")]
    fn renders_digit_strings(value: i64, radix: u32, expected: &str) {
        assert_eq!(to_base(value, radix).unwrap(), expected)
    }

    #[test]
    fn renders_long_min() {
        let rendered = to_base(i64::min_value(), 16).unwrap();
        assert_eq!(rendered, "-8000000000000000");
    }

    #[test]
    fn round_trips_every_base() {
        for radix in 2..=36 {
            for &value in [0i64, 1, 35, 36, 12345, -9876].iter() {
                let rendered = to_base(value, radix).unwrap();
                assert_eq!(from_base(&rendered, radix, false).unwrap(), value);
            }
        }
    }

    #[test]
    fn digit_string_round_trip_modulo_leading_zeros() {
        for radix in 2..=36 {
            for text in ["10", "101", "0", "1"].iter() {
                let decimal = rebase(text, radix, 10).unwrap();
                assert_eq!(&rebase(&decimal, 10, radix).unwrap(), text);
            }
        }
    }

    #[test_case("0.5", 10, 0.5 ; "decimal half")]
    #[test_case("FF.8", 16, 255.5 ; "hex half")]
    #[test_case("-1.1", 2, -1.5 ; "negative binary")]
    #[test_case("42", 10, 42.0 ; "no fraction")]
    fn reads_fractions(text: &str, radix: u32, expected: f64) {
        let value = decimal_from_base(text, radix).unwrap();
        assert!((value - expected).abs() < 1e-9);
    }

    #[test]
    fn rejects_invalid_fraction_digit() {
        assert_eq!(
            decimal_from_base("1.G", 16).unwrap_err(),
            BaseError::InvalidDigit('G')
        );
    }

    #[test_case(0.5, 2, "0.1" ; "binary half")]
    #[test_case(255.5, 16, "FF.8" ; "hex half")]
    #[test_case(-2.25, 10, "-2.25" ; "negative decimal")]
    #[test_case(3.0, 10, "3" ; "whole double")]
    fn renders_fractions(value: f64, radix: u32, expected: &str) {
        assert_eq!(decimal_to_base(value, radix, MAX_FRACTION_DIGITS).unwrap(), expected)
    }

    #[test]
    fn bounds_repeating_fractions() {
        let rendered = decimal_to_base(1.0 / 3.0, 10, MAX_FRACTION_DIGITS).unwrap();
        assert_eq!(rendered, "0.3333333333");
    }

    #[test]
    fn rejects_non_finite() {
        assert!(decimal_to_base(f64::NAN, 10, MAX_FRACTION_DIGITS).is_err());
        assert!(decimal_to_base(f64::INFINITY, 10, MAX_FRACTION_DIGITS).is_err());
    }

    #[test]
    fn rebases_fractional_strings() {
        assert_eq!(decimal_rebase("FF.8", 16, 10).unwrap(), "255.5");
        assert_eq!(decimal_rebase("255", 10, 16).unwrap(), "FF");
    }
}
