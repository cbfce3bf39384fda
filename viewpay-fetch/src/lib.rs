// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ViewPay` Fetch
//!
//! HTTP access to the external exchange-rate service.
//!
//! This crate provides:
//!
//! - [`HttpClient`] - reqwest wrapper with timeout and retry handling
//! - [`RetryStrategy`] - backoff policy for transient failures
//! - [`RateClient`] - the currency-api collaborator: USD exchange rates
//!   and the currency display-name listing
//! - [`RateSource`] - the seam the rate store consumes, so it can be
//!   tested without a network
//!
//! Network failure here is never fatal to the overlay pipeline: the
//! store keeps its last known state and the caller decides whether to
//! surface the error.

pub mod client;
pub mod error;
pub mod rates;
pub mod retry;

pub use client::HttpClient;
pub use error::FetchError;
pub use rates::{CurrencyName, RateClient, RateSource, DEFAULT_BASE_URL};
pub use retry::RetryStrategy;
