// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ViewPay` DOM
//!
//! A minimal, externally-owned document tree for the `ViewPay` overlay
//! pipeline.
//!
//! The real host renders its own markup; this crate models the slice of
//! document behavior the overlay engine depends on:
//!
//! - An arena of nodes with tag names, class lists, and text
//! - Structural navigation (parent, children, siblings, ancestors)
//! - Subtree cloning and sibling insertion
//! - A revision counter with `tokio::sync::watch` change notification,
//!   the mutation-observer analog the scheduler subscribes to
//!
//! Mutations that change nothing (setting text to its current value,
//! adding a class that is already present) do not bump the revision.
//! This is what lets a redundant overlay pass quiesce instead of
//! re-triggering itself forever.

pub mod error;
pub mod tree;

pub use error::DomError;
pub use tree::{Document, Node, NodeId};
