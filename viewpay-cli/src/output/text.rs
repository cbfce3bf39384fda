//! Text output formatting with colors.

use viewpay_fetch::CurrencyName;

use crate::output::json::{EstimateOutput, RateOutput};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Bold text.
    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    /// Dimmed text.
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    /// Green text.
    pub fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    /// Cyan text.
    pub fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    /// Formats an estimate: the display amount, plus a detail line in
    /// verbose mode.
    pub fn format_estimate(&self, output: &EstimateOutput, verbose: bool) -> String {
        let mut lines = vec![self.bold(&output.formatted)];
        if verbose {
            lines.push(self.dim(&format!(
                "{} views \u{b7} {} {} per USD",
                group_thousands(output.count),
                output.usd_rate,
                output.currency
            )));
        }
        lines.join("\n")
    }

    /// Formats an exchange rate.
    pub fn format_rate(&self, output: &RateOutput) -> String {
        format!(
            "1 USD = {} {}",
            self.bold(&output.usd_rate.to_string()),
            self.cyan(&output.code)
        )
    }

    /// Formats the currency listing, one code per line.
    pub fn format_currencies(&self, names: &[CurrencyName]) -> String {
        names
            .iter()
            .map(|n| {
                // Pad before painting; escape codes would skew the column.
                let code = format!("{:<6}", n.code.to_uppercase());
                format!("{} {}", self.cyan(&code), n.name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Groups an integer en-US style: `2100000` becomes `2,100,000`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
