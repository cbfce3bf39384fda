//! Core error types for `ViewPay`.

use thiserror::Error;

/// Core error type for `ViewPay` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Count text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A currency state failed its invariant check.
    #[error("Invalid currency state: {0}")]
    InvalidCurrencyState(String),
}

/// Failure to parse a raw count string.
///
/// Parse failures are recoverable by design: the node that produced the
/// text is skipped for the current pass and retried on the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No run of digits was found in the text.
    #[error("No digits in count text: {0:?}")]
    NoDigits(String),

    /// The magnitude does not fit in a 64-bit count.
    #[error("Count out of range: {0:?}")]
    OutOfRange(String),
}
