//! Timing-evidence sources at the adapter boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interval::{Interval, ValidationError};

/// A validated source identifier.
///
/// Source IDs must be non-empty strings. They name the logical origin of
/// timing evidence (e.g., "git", "wakatime", "claude") and are opaque to the
/// reconciler itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(String);

impl SourceId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty { field: "source ID" });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The timing evidence one source delivers.
///
/// Point-event sources (prompt logs) yield bare timestamps that still need
/// session detection; duration sources (commit sessions, keystroke trackers)
/// yield intervals directly. The reconciler pattern-matches on this instead
/// of duck-typing on document keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum SourceEvents {
    /// Timestamped occurrences with no inherent duration, seconds since the
    /// UTC epoch. May be unsorted and may contain duplicates.
    Points(Vec<f64>),
    /// Spans of tracked activity. May be unsorted and may overlap.
    Intervals(Vec<Interval>),
}

impl SourceEvents {
    /// Number of events carried by this source.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Points(points) => points.len(),
            Self::Intervals(intervals) => intervals.len(),
        }
    }

    /// Returns true if this source carries no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The wire tag for this variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Points(_) => "points",
            Self::Intervals(_) => "intervals",
        }
    }
}
