//! Decimal parsing for form input.
//!
//! Two flavours are provided: a lenient one that reads the longest numeric
//! prefix of the input the way browser number fields hand values over
//! (`"2.5kg"` reads as 2.5), and a strict one that requires the whole input to
//! be a number.

use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{opt, recognize},
    IResult, Parser,
};

/// Recognize `[+-]digits[.digits][e[+-]digits]` or `[+-].digits[e...]`.
///
/// A dangling exponent marker (`"1e"`) is not part of the number.
fn decimal(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(one_of("+-")),
        alt((
            recognize((digit1, opt((char('.'), digit0)))),
            recognize((char('.'), digit1)),
        )),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)
}

/// Parse the longest decimal prefix after leading whitespace.
pub fn parse_leading_decimal(input: &str) -> Option<f64> {
    let (rest, _) = multispace0::<&str, nom::error::Error<&str>>(input).ok()?;
    let (_, number) = decimal(rest).ok()?;
    number.parse::<f64>().ok()
}

/// Parse a decimal that spans the whole (trimmed) input.
pub fn parse_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    match decimal(trimmed) {
        Ok(("", number)) => number.parse::<f64>().ok(),
        _ => None,
    }
}

/// Read a non-negative quantity from free text. Anything that does not start
/// with a number, is not finite, or is negative becomes zero.
pub fn coerce_quantity(input: &str) -> f64 {
    match parse_leading_decimal(input) {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_decimal_reads_prefix() {
        assert_eq!(parse_leading_decimal("2.5kg"), Some(2.5));
        assert_eq!(parse_leading_decimal("  42"), Some(42.0));
        assert_eq!(parse_leading_decimal(".5"), Some(0.5));
        assert_eq!(parse_leading_decimal("3."), Some(3.0));
        assert_eq!(parse_leading_decimal("1e3"), Some(1000.0));
        assert_eq!(parse_leading_decimal("-1.25"), Some(-1.25));
    }

    #[test]
    fn test_leading_decimal_ignores_dangling_exponent() {
        assert_eq!(parse_leading_decimal("1e"), Some(1.0));
        assert_eq!(parse_leading_decimal("7E+"), Some(7.0));
    }

    #[test]
    fn test_leading_decimal_rejects_non_numbers() {
        assert_eq!(parse_leading_decimal(""), None);
        assert_eq!(parse_leading_decimal("abc"), None);
        assert_eq!(parse_leading_decimal("."), None);
        assert_eq!(parse_leading_decimal("kg 2"), None);
    }

    #[test]
    fn test_strict_decimal() {
        assert_eq!(parse_decimal(" 2.0 "), Some(2.0));
        assert_eq!(parse_decimal("12"), Some(12.0));
        assert_eq!(parse_decimal("2.0L"), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("1 2"), None);
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity("1.5"), 1.5);
        assert_eq!(coerce_quantity("0.2 kg"), 0.2);
        assert_eq!(coerce_quantity("abc"), 0.0);
        assert_eq!(coerce_quantity(""), 0.0);
        assert_eq!(coerce_quantity("-1"), 0.0);
        assert_eq!(coerce_quantity("-0"), 0.0);
        assert_eq!(coerce_quantity("1e400"), 0.0);
    }
}
