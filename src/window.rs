//! Near-term window selection.

use chrono::{Duration, NaiveDateTime};

use crate::contract::TripRecord;

/// Forward-looking interval `[start, end)` used to pick near-term trips for
/// the detailed table. Inclusive of `start`, exclusive of `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportWindow {
    pub fn from_now(now: NaiveDateTime, hours: i64) -> Self {
        Self {
            start: now,
            end: now + Duration::hours(hours),
        }
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }
}

/// Keeps the records whose scheduled time falls inside the window.
///
/// An empty result is a normal outcome (quiet period), not an error; the
/// assembler renders an explicit empty-state line for it.
pub fn select_window(records: &[TripRecord], window: ReportWindow) -> Vec<TripRecord> {
    records
        .iter()
        .filter(|r| window.contains(r.scheduled_time))
        .cloned()
        .collect()
}
