//! Core reconciliation logic for time-lens.
//!
//! This crate contains the fundamental types and logic for:
//! - Session detection: grouping point events into sessions by gap threshold
//! - Interval merging: folding all sources into one deduplicated timeline
//! - Hour estimation: buffered, floored effort estimates per session
//!
//! Everything here is pure computation over in-memory data. Timestamps are
//! f64 seconds since the UTC epoch; adapters normalize units and time zones
//! before data reaches this crate.

mod interval;
mod reconcile;
mod source;

pub use interval::{Interval, ValidationError};
pub use reconcile::{
    Reconciliation, ReconcileConfig, estimate_hours, merge_intervals, reconcile,
    sessions_from_points,
};
pub use source::{SourceEvents, SourceId};
