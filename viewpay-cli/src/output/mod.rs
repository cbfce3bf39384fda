//! Output formatting for CLI.

mod json;
mod text;

pub use json::{EstimateOutput, JsonFormatter, ParseOutput, RateOutput};
pub use text::TextFormatter;
#[cfg(test)]
mod tests;
