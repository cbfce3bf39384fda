//! Parsing of abbreviated, locale-formatted view counts.
//!
//! Host pages render counts like `"1,234"`, `"12.3K"` or `"1.234,56"`.
//! [`parse`] turns such text into the exact underlying integer. The
//! function is pure: same input, same output, no side effects.

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ParseError;

/// Pattern for the leading numeric run and its optional unit suffix.
///
/// The run starts at the first digit and may continue with digits and
/// grouping/decimal separators; a single `k`/`m`/`b` directly after the
/// run scales it. Surrounding label text (e.g. "2.1M Views") is ignored.
static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9][0-9.,]*)([kmb])?").expect("Invalid regex"));

/// Parses a raw count string into an exact non-negative integer.
///
/// Separator disambiguation: if a `.` or `,` appears within the last
/// three characters of the numeric run, the separator immediately
/// preceding the final one or two digits is the decimal point and all
/// earlier separators are grouping; otherwise every separator is
/// grouping. The unit suffix multiplies by 1e3/1e6/1e9; any fractional
/// remainder after scaling is dropped, since a view count is a whole
/// quantity.
///
/// # Errors
///
/// Returns [`ParseError::NoDigits`] when the text contains no digit run,
/// and [`ParseError::OutOfRange`] when the scaled magnitude does not fit
/// in a `u64`. Never panics.
///
/// # Examples
///
/// ```
/// assert_eq!(viewpay_core::parse("1,234").unwrap(), 1_234);
/// assert_eq!(viewpay_core::parse("12.3K").unwrap(), 12_300);
/// assert_eq!(viewpay_core::parse("1.234,56").unwrap(), 1_234);
/// ```
pub fn parse(text: &str) -> Result<u64, ParseError> {
    let captures = COUNT_RE
        .captures(text)
        .ok_or_else(|| ParseError::NoDigits(text.to_string()))?;

    let run = &captures[1];
    let magnitude = Decimal::from_str(&normalize(run))
        .map_err(|_| ParseError::OutOfRange(text.to_string()))?;

    let multiplier = match captures.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(s) if s == "k" => dec!(1_000),
        Some(s) if s == "m" => dec!(1_000_000),
        Some(_) => dec!(1_000_000_000),
        None => Decimal::ONE,
    };

    magnitude
        .checked_mul(multiplier)
        .map(|scaled| scaled.trunc())
        .and_then(|d| d.to_u64())
        .ok_or_else(|| ParseError::OutOfRange(text.to_string()))
}

/// Rewrites a numeric run into plain `digits[.digits]` form.
///
/// Grouping separators are removed; the decimal separator, if one is
/// identified, becomes `.`.
fn normalize(run: &str) -> String {
    let decimal_pos = run.rfind([',', '.']).filter(|&pos| {
        let digits_after = run.len() - pos - 1;
        // Separator inside the last three characters, followed by one or
        // two digits, marks the decimal point. Everything else groups.
        pos + 3 >= run.len() && (1..=2).contains(&digits_after)
    });

    run.char_indices()
        .filter_map(|(i, c)| match c {
            ',' | '.' if Some(i) == decimal_pos => Some('.'),
            ',' | '.' => None,
            _ => Some(c),
        })
        .collect()
}
