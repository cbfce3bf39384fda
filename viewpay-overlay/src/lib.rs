// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ViewPay` Overlay
//!
//! The overlay pipeline: walks a host document, converts every view
//! count it finds into an earnings estimate, and injects (or refreshes)
//! estimate overlays next to the counts.
//!
//! Three pieces:
//!
//! - [`AnchorLocator`] - the host-markup adapter: knows which nodes are
//!   view-count anchors and where the count text lives
//! - [`OverlayEngine`] - a full document pass: inject once per anchor,
//!   rewrite values in place on every pass
//! - [`Scheduler`] - turns document mutations and rate refreshes into
//!   throttled engine passes (leading and trailing edge, bursts
//!   coalesced)
//!
//! A pass is idempotent: running the engine twice with the same state
//! leaves the document byte-identical and does not bump its revision,
//! which is what lets the scheduler quiesce.

pub mod engine;
pub mod locator;
pub mod sample;
pub mod scheduler;

pub use engine::{OverlayEngine, RunReport};
pub use locator::{
    AnchorLocator, FeedLocator, ESTIMATE_BOX_CLASS, ESTIMATE_SYMBOL_CLASS, ESTIMATE_VALUE_CLASS,
};
pub use scheduler::{Scheduler, SchedulerConfig};
