//! Output formatter tests.

use rust_decimal_macros::dec;
use viewpay_fetch::CurrencyName;

use crate::output::json::{EstimateOutput, JsonFormatter, RateOutput};
use crate::output::text::TextFormatter;

fn estimate_output() -> EstimateOutput {
    EstimateOutput {
        text: "2.1M".to_string(),
        count: 2_100_000,
        currency: "USD".to_string(),
        usd_rate: dec!(1),
        amount: dec!(54.6),
        formatted: "$54.60".to_string(),
    }
}

#[test]
fn test_json_estimate_uses_camel_case_keys() {
    let json = JsonFormatter::new(false).format(&estimate_output()).unwrap();
    assert!(json.contains(r#""usdRate":"#));
    assert!(json.contains(r#""formatted":"$54.60""#));
    assert!(json.contains(r#""count":2100000"#));
}

#[test]
fn test_json_pretty_is_multiline() {
    let json = JsonFormatter::new(true).format(&estimate_output()).unwrap();
    assert!(json.contains('\n'));
}

#[test]
fn test_text_estimate_plain() {
    let formatter = TextFormatter::new(false);
    assert_eq!(formatter.format_estimate(&estimate_output(), false), "$54.60");
}

#[test]
fn test_text_estimate_verbose_adds_detail_line() {
    let formatter = TextFormatter::new(false);
    let out = formatter.format_estimate(&estimate_output(), true);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("2,100,000 views"));
}

#[test]
fn test_text_colors_wrap_in_escape_codes() {
    let colored = TextFormatter::new(true);
    let plain = TextFormatter::new(false);
    assert!(colored.bold("x").contains("\x1b[1m"));
    assert_eq!(plain.bold("x"), "x");
}

#[test]
fn test_rate_line() {
    let formatter = TextFormatter::new(false);
    let output = RateOutput {
        code: "EUR".to_string(),
        usd_rate: dec!(0.92),
    };
    assert_eq!(formatter.format_rate(&output), "1 USD = 0.92 EUR");
}

#[test]
fn test_currency_listing_is_aligned() {
    let formatter = TextFormatter::new(false);
    let names = vec![
        CurrencyName {
            code: "eur".to_string(),
            name: "Euro".to_string(),
        },
        CurrencyName {
            code: "usd".to_string(),
            name: "United States Dollar".to_string(),
        },
    ];
    let out = formatter.format_currencies(&names);
    assert_eq!(out, "EUR    Euro\nUSD    United States Dollar");
}
