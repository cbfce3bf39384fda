// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ViewPay` Store
//!
//! State management for the `ViewPay` application.
//!
//! This crate provides:
//!
//! - **`SettingsStore`**: the persisted user preference (currency code)
//!   with watch-channel change notification
//! - **`RateStore`**: the process-wide currency state - active code and
//!   its USD exchange rate - with a single refresh write path
//! - **Persistence**: JSON file I/O helpers
//!
//! The rate store is the only writer of [`viewpay_core::CurrencyState`];
//! the overlay side only ever reads a whole-record copy. Refreshes are
//! sequence-stamped so a slow response can never overwrite a newer one.
//!
//! ## Usage
//!
//! ```ignore
//! use viewpay_store::{RateStore, SettingsStore};
//!
//! let settings = SettingsStore::load_default().await?;
//! let rates = RateStore::new(Arc::new(RateClient::new()?));
//!
//! // Initial refresh + follow every settings change
//! let handle = rates.clone().watch_settings(settings.clone());
//!
//! // Re-render whenever the state changes
//! let mut rx = rates.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("currency state updated");
//! }
//! ```

pub mod error;
pub mod persistence;
pub mod rates;
pub mod settings;

pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use rates::RateStore;
pub use settings::{Settings, SettingsStore};

#[cfg(test)]
mod persistence_tests;
