//! Half-open time interval primitives.
//!
//! Every conflict test in the scheduling core is an interval-intersection
//! test over half-open `[start, end)` intervals, never a point comparison:
//! `[a1, a2)` overlaps `[b1, b2)` iff `a1 < b2 && b1 < a2`. Touching
//! intervals (`a2 == b1`) do not overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Returns true when the half-open intervals `[a_start, a_end)` and
/// `[b_start, b_end)` intersect.
pub fn intervals_overlap<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// A half-open `[start, end)` span of absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a new range. `start` must precede `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "TimeRange requires start < end");
        Self { start, end }
    }

    /// Half-open overlap against another range.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        intervals_overlap(self.start, self.end, other.start, other.end)
    }

    /// Half-open overlap against a raw `[start, end)` pair.
    pub fn overlaps_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        intervals_overlap(self.start, self.end, start, end)
    }

    /// Whether an instant falls inside the range (start inclusive, end exclusive).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Length of the range in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}
