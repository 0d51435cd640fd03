//! Shared helpers for command output.

use std::collections::BTreeMap;

use chrono::DateTime;
use lens_core::{Interval, SourceEvents, SourceId};
use serde::Serialize;

/// Per-source input breakdown, kept alongside (not inside) the core result.
#[derive(Debug, Serialize)]
pub struct SourceExport {
    pub id: String,
    pub kind: String,
    pub events: usize,
    /// Earliest timestamp in this source, seconds since the UTC epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<f64>,
    /// Latest timestamp in this source, seconds since the UTC epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<f64>,
    /// Sum of raw interval durations; absent for point sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked_hours: Option<f64>,
}

/// Builds the per-source breakdown for a loaded source map.
pub fn source_breakdown(sources: &BTreeMap<SourceId, SourceEvents>) -> Vec<SourceExport> {
    sources
        .iter()
        .map(|(id, events)| {
            let (first, last, tracked_hours) = match events {
                SourceEvents::Points(points) => (
                    points.iter().copied().reduce(f64::min),
                    points.iter().copied().reduce(f64::max),
                    None,
                ),
                SourceEvents::Intervals(intervals) => {
                    let tracked: f64 = intervals.iter().map(Interval::duration_hours).sum();
                    (
                        intervals.iter().map(Interval::start).reduce(f64::min),
                        intervals.iter().map(Interval::end).reduce(f64::max),
                        (!intervals.is_empty()).then(|| round_hours(tracked)),
                    )
                }
            };

            SourceExport {
                id: id.to_string(),
                kind: events.kind().to_string(),
                events: events.len(),
                first,
                last,
                tracked_hours,
            }
        })
        .collect()
}

/// Rounds an hour value to millihour precision for output.
#[must_use]
pub fn round_hours(hours: f64) -> f64 {
    (hours * 1000.0).round() / 1000.0
}

/// Renders an epoch-seconds timestamp as RFC 3339 UTC.
///
/// Timestamps outside chrono's representable range fall back to the raw
/// number; output stays total for pathological-but-valid input.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_utc(ts: f64) -> String {
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1_000_000_000.0).round().min(999_999_999.0);
    DateTime::from_timestamp(secs as i64, nanos as u32)
        .map_or_else(|| ts.to_string(), |dt| dt.to_rfc3339())
}
