//! CLI command implementations.

pub mod config;
pub mod currencies;
pub mod estimate;
pub mod parse;
pub mod rates;
pub mod watch;
