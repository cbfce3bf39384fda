//! JSON output formatting.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for the parse command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutput {
    /// The input text as given.
    pub text: String,
    /// The resolved exact count.
    pub count: u64,
}

/// JSON output for the estimate command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateOutput {
    /// The input text as given.
    pub text: String,
    /// The resolved exact count.
    pub count: u64,
    /// Uppercase currency code the estimate is rendered in.
    pub currency: String,
    /// Units of the currency per one USD.
    pub usd_rate: Decimal,
    /// The unformatted estimate amount.
    pub amount: Decimal,
    /// The display string, symbol included.
    pub formatted: String,
}

/// JSON output for the rates command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOutput {
    /// Uppercase currency code.
    pub code: String,
    /// Units of the currency per one USD.
    pub usd_rate: Decimal,
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter with optional pretty-printing.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serializes a value to a JSON string.
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(out)
    }
}
