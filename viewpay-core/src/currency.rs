//! Currency display formatting.
//!
//! Renders a monetary amount in en-US style for a given currency code:
//! the currency glyph, grouped integer digits, and a fraction whose
//! length follows the estimate precision policy. Codes without a known
//! glyph fall back to plain USD-style digits with a pseudo-symbol built
//! from the code itself; an unrecognized code is never an error.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::estimate::scale_for;
use crate::models::CurrencyState;

// ============================================================================
// Options
// ============================================================================

/// Options for [`format`].
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Prefix the rendered amount with the currency symbol.
    pub with_symbol: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { with_symbol: true }
    }
}

// ============================================================================
// Symbol Table
// ============================================================================

/// Glyphs for recognized ISO 4217 codes, as rendered in the en-US locale.
///
/// Codes whose en-US rendering is the code itself (CHF, SEK, ...) are
/// listed explicitly: they are recognized, not fallback cases.
fn symbol_for(code: &str) -> Option<&'static str> {
    let glyph = match code {
        "USD" => "$",
        "EUR" => "\u{20ac}",
        "GBP" => "\u{a3}",
        "JPY" => "\u{a5}",
        "CNY" => "CN\u{a5}",
        "KRW" => "\u{20a9}",
        "INR" => "\u{20b9}",
        "RUB" => "\u{20bd}",
        "BRL" => "R$",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "TWD" => "NT$",
        "MXN" => "MX$",
        "CHF" => "CHF",
        "SEK" | "NOK" | "DKK" => "kr",
        "PLN" => "z\u{142}",
        "TRY" => "\u{20ba}",
        "THB" => "\u{e3f}",
        "VND" => "\u{20ab}",
        "NGN" => "\u{20a6}",
        "ILS" => "\u{20aa}",
        "PHP" => "\u{20b1}",
        "UAH" => "\u{20b4}",
        "KZT" => "\u{20b8}",
        "GEL" => "\u{20be}",
        "AZN" => "\u{20bc}",
        "CRC" => "\u{20a1}",
        "PYG" => "\u{20b2}",
        "LAK" => "\u{20ad}",
        "MNT" => "\u{20ae}",
        "BDT" => "\u{9f3}",
        "GHS" => "GH\u{20b5}",
        "KES" => "KSh",
        "SGD" => "SGD",
        "ZAR" => "ZAR",
        "AED" => "AED",
        "SAR" => "SAR",
        "IDR" => "IDR",
        "CZK" => "CZK",
        "HUF" => "HUF",
        _ => return None,
    };
    Some(glyph)
}

// ============================================================================
// Formatting
// ============================================================================

/// Splits a formatted amount into its symbol and numeric parts.
///
/// The numeric part never contains whitespace. For an unrecognized
/// currency code the amount is rendered USD-style and the pseudo-symbol
/// is the uppercased first character of the code followed by a space.
pub fn format_parts(amount: Decimal, state: &CurrencyState) -> (String, String) {
    let value = grouped_digits(amount);
    match symbol_for(&state.code.to_uppercase()) {
        Some(glyph) => (glyph.to_string(), value),
        None => (pseudo_symbol(&state.code), value),
    }
}

/// Formats an amount for display in the given currency.
pub fn format(amount: Decimal, state: &CurrencyState, options: FormatOptions) -> String {
    let (symbol, value) = format_parts(amount, state);
    if options.with_symbol {
        format!("{symbol}{value}")
    } else {
        value
    }
}

/// Returns the display symbol for a currency.
///
/// Callers rendering into constrained space may truncate this to its
/// first character; that is their presentation policy, not ours.
pub fn symbol_of(state: &CurrencyState) -> String {
    format_parts(Decimal::ZERO, state).0
}

/// Pseudo-symbol for codes without a known glyph.
fn pseudo_symbol(code: &str) -> String {
    let first = code
        .chars()
        .next()
        .map_or('\u{a4}', |c| c.to_ascii_uppercase());
    format!("{first} ")
}

/// Renders digits en-US style: comma grouping, `.` decimal point, and a
/// fraction length chosen by the precision policy.
fn grouped_digits(amount: Decimal) -> String {
    let scale = scale_for(amount);
    let rounded =
        amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{rounded:.prec$}", prec = scale as usize);

    let (integer, fraction) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3);
    let digits = integer.strip_prefix('-').unwrap_or(integer);
    if digits.len() < integer.len() {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(f) = fraction {
        grouped.push('.');
        grouped.push_str(f);
    }
    grouped
}
