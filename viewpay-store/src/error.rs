//! Store error types.

use thiserror::Error;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The rate service could not be reached or answered badly.
    #[error("Rate fetch error: {0}")]
    Fetch(#[from] viewpay_fetch::FetchError),

    /// A fetched rate violated the currency state invariant.
    #[error("Core error: {0}")]
    Core(#[from] viewpay_core::CoreError),
}
