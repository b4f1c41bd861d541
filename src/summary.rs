//! Per-shift pending totals.

use std::collections::HashMap;

use chrono::Timelike;

use crate::contract::TripRecord;
use crate::shift::Shift;

/// Builds the shift summary lines over the entire record set (not just the
/// windowed subset), one line per non-current shift in priority order.
///
/// Zero-count shifts are listed explicitly: a reader should see "0 trips
/// pending" rather than wonder whether a shift was dropped.
pub fn summarize(records: &[TripRecord], current: Shift) -> Vec<String> {
    let mut counts: HashMap<Shift, usize> = HashMap::new();
    for record in records {
        let shift = Shift::of_hour(record.scheduled_time.hour());
        *counts.entry(shift).or_insert(0) += 1;
    }

    current
        .priority_order()
        .iter()
        .map(|shift| {
            let count = counts.get(shift).copied().unwrap_or(0);
            let noun = if count == 1 { "trip" } else { "trips" };
            format!("• {shift}: {count} {noun} pending")
        })
        .collect()
}
