//! Operational shift classification.
//!
//! The day is split into three fixed eight-hour shifts; every hour of the day
//! belongs to exactly one of them. The third shift wraps midnight.

use std::fmt;

/// One of the three fixed operating periods covering a day.
///
/// - Shift 1: 06:00–14:00
/// - Shift 2: 14:00–22:00
/// - Shift 3: 22:00–06:00 (wraps midnight)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    First,
    Second,
    Third,
}

impl Shift {
    /// Maps an hour of day (0–23) to its shift.
    ///
    /// # Panics
    ///
    /// Panics on `hour >= 24`. Callers only pass hour values taken from a
    /// parsed timestamp, so anything else is a caller bug, not a condition
    /// to recover from.
    pub fn of_hour(hour: u32) -> Shift {
        assert!(hour < 24, "hour out of range: {hour}");
        match hour {
            6..=13 => Shift::First,
            14..=21 => Shift::Second,
            _ => Shift::Third,
        }
    }

    /// The two shifts other than `self`, in the cyclic order following it.
    ///
    /// The summary leads with whatever comes after the shift currently in
    /// progress, so the reader sees "what's next" first.
    pub fn priority_order(self) -> [Shift; 2] {
        match self {
            Shift::First => [Shift::Second, Shift::Third],
            Shift::Second => [Shift::Third, Shift::First],
            Shift::Third => [Shift::First, Shift::Second],
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shift::First => "Shift 1",
            Shift::Second => "Shift 2",
            Shift::Third => "Shift 3",
        };
        f.write_str(name)
    }
}
