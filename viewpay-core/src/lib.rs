// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ViewPay` Core
//!
//! Core types and pure conversion logic for the `ViewPay` application.
//!
//! This crate provides the foundational pieces used across all other
//! `ViewPay` crates, including:
//!
//! - Domain models (currency state)
//! - Error types
//! - The count parser for abbreviated, locale-formatted view counts
//! - The earnings estimate calculator
//! - The currency display formatter
//!
//! Everything in this crate is pure and synchronous: no I/O, no shared
//! state. The mutable pieces of the system (rate store, overlay engine,
//! scheduler) live in the sibling crates and call into this one.
//!
//! ## Key Types
//!
//! - [`CurrencyState`] - The active currency code and its USD exchange rate
//! - [`count::parse`] - Abbreviated count string to exact integer
//! - [`estimate`] - Raw count to monetary estimate
//! - [`currency`] - Localized currency display formatting

pub mod count;
pub mod currency;
pub mod error;
pub mod estimate;
pub mod models;

// Re-export error types
pub use error::{CoreError, ParseError};

// Re-export model types
pub use models::CurrencyState;

// Re-export the conversion entry points
pub use count::parse;
pub use currency::{format, format_parts, symbol_of, FormatOptions};
pub use estimate::{estimate_in, to_currency, to_usd, UNIT_RATE_USD};
