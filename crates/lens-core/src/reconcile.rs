//! Interval reconciliation algorithm.
//!
//! Merges heterogeneous time-evidence sources into a deduplicated estimate
//! of total working time.
//!
//! # Algorithm Summary
//!
//! 1. Group each point-event source into sessions (gap > τ = new session)
//! 2. Merge all sessions and raw intervals across sources into one timeline
//! 3. Estimate hours per merged session (buffer + floor) and sum

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::interval::{Interval, ValidationError};
use crate::source::{SourceEvents, SourceId};

/// Configuration for reconciliation.
///
/// Always passed explicitly so callers can reconcile with arbitrary
/// thresholds; there is no module-level default beyond [`Default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Maximum silence between time-ordered events, in hours, before they
    /// belong to different sessions. Used both when grouping point events
    /// and when merging intervals across sources.
    /// Default: 1.5.
    pub gap_threshold_hours: f64,

    /// Hours added to each merged session to cover untracked time adjacent
    /// to the first and last tracked events.
    /// Default: 0.5.
    pub buffer_hours: f64,

    /// Minimum hours credited per merged session.
    /// Default: 0.5.
    pub floor_hours: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            gap_threshold_hours: 1.5,
            buffer_hours: 0.5,
            floor_hours: 0.5,
        }
    }
}

impl ReconcileConfig {
    /// The gap threshold in seconds, the unit the timeline is expressed in.
    #[must_use]
    pub const fn gap_threshold_secs(&self) -> f64 {
        self.gap_threshold_hours * 3600.0
    }
}

/// Result of reconciling all sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    /// The merged session set, time-ordered, pairwise separated by more
    /// than the gap threshold.
    pub sessions: Vec<Interval>,

    /// Sum of the per-session hour estimates.
    pub total_hours: f64,
}

/// Groups an unordered list of point events into sessions.
///
/// Consecutive points (after sorting) that are at most `gap_secs` apart
/// extend the current session; a larger gap starts a new one. Each session
/// spans from its first to its last point, so a lone point yields a
/// zero-duration interval.
///
/// Points must be finite; [`reconcile`] validates them before calling this.
#[must_use]
pub fn sessions_from_points(points: &[f64], gap_secs: f64) -> Vec<Interval> {
    let mut sorted = points.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let mut sessions = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return sessions;
    };

    let mut start = first;
    let mut end = first;
    for point in iter {
        if point - end > gap_secs {
            sessions.push(Interval::from_ordered(start, end));
            start = point;
        }
        end = point;
    }
    sessions.push(Interval::from_ordered(start, end));
    sessions
}

/// Merges intervals from arbitrarily many sources into one session set.
///
/// Input may be unsorted and overlapping. Output intervals are ordered by
/// start, each input interval is fully contained in exactly one of them,
/// and no two are within `gap_secs` of each other. The threshold is
/// inclusive: intervals exactly `gap_secs` apart merge.
#[must_use]
pub fn merge_intervals(intervals: &[Interval], gap_secs: f64) -> Vec<Interval> {
    let mut sorted = intervals.to_vec();
    // Ties on start are broken arbitrarily; max-extension makes the merged
    // result independent of their relative order.
    sorted.sort_unstable_by(|a, b| a.start().total_cmp(&b.start()));

    let mut merged: Vec<Interval> = Vec::new();
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start() - last.end() <= gap_secs => {
                // A later-starting interval may still end earlier than one
                // already folded in; never shrink the session.
                last.extend_to(interval.end());
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Estimates actual elapsed effort for one merged session.
///
/// Tracked events lag the real start of a session and lead its real end;
/// the buffer compensates, and the floor keeps a near-zero tracked span
/// (a single commit, say) from collapsing to nothing.
#[must_use]
pub fn estimate_hours(interval: &Interval, config: &ReconcileConfig) -> f64 {
    (interval.duration_hours() + config.buffer_hours).max(config.floor_hours)
}

/// Reconciles all sources into a merged session set and total estimate.
///
/// Point sources are grouped into sessions, interval sources are taken
/// as-is at whatever granularity their adapter pre-merged them, and the
/// combined list is merged once under the configured gap threshold.
///
/// The result is deterministic under any permutation of the source map and
/// of the values within each source. Re-supplying a result's session set as
/// a single `intervals` source reproduces it unchanged, which is what makes
/// incremental multi-repository merging work.
///
/// # Errors
///
/// Returns [`ValidationError::NonFiniteTimestamp`] if a points source
/// carries a NaN or infinite value. Intervals are validated at
/// construction, so no further checks apply here. Empty input is not an
/// error: it yields an empty session set and a total of zero.
pub fn reconcile(
    sources: &BTreeMap<SourceId, SourceEvents>,
    config: &ReconcileConfig,
) -> Result<Reconciliation, ValidationError> {
    let gap_secs = config.gap_threshold_secs();

    // Per-source session detection is independent, so sources run in
    // parallel; the merged result is identical to the sequential fold.
    let per_source: Vec<Vec<Interval>> = sources
        .par_iter()
        .map(|(id, events)| {
            if events.is_empty() {
                tracing::warn!(source = %id, "source contains no events");
            }
            let intervals = match events {
                SourceEvents::Points(points) => {
                    for &point in points {
                        if !point.is_finite() {
                            return Err(ValidationError::NonFiniteTimestamp { value: point });
                        }
                    }
                    sessions_from_points(points, gap_secs)
                }
                SourceEvents::Intervals(intervals) => intervals.clone(),
            };
            tracing::debug!(
                source = %id,
                kind = events.kind(),
                events = events.len(),
                intervals = intervals.len(),
                "normalized source"
            );
            Ok(intervals)
        })
        .collect::<Result<_, _>>()?;

    let combined: Vec<Interval> = per_source.into_iter().flatten().collect();
    let sessions = merge_intervals(&combined, gap_secs);
    let total_hours = sessions
        .iter()
        .map(|session| estimate_hours(session, config))
        .sum();

    tracing::debug!(
        input_intervals = combined.len(),
        merged_sessions = sessions.len(),
        total_hours,
        "reconciled sources"
    );

    Ok(Reconciliation {
        sessions,
        total_hours,
    })
}
