//! Fixed-width table rendering for the near-term trip window.
//!
//! The table is meant to be read inside a monospace literal block in the
//! chat client, so every row is padded to a fixed column layout. Widths are
//! configuration, never derived from the data; values that do not fit are
//! truncated with a visible `…`.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::Deserialize;

use crate::contract::TripRecord;

/// Sentinel shown when a dock field carries no usable number.
const NO_DOCK: &str = "--";

/// Minutes from "now" at or under which a row is flagged as imminent.
const IMMINENT_MINUTES: i64 = 10;

/// Column widths for the rendered table. The single source of truth for all
/// width math in the report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub id: usize,
    pub dock: usize,
    pub time: usize,
    pub destination: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            id: 15,
            dock: 6,
            time: 7,
            destination: 20,
        }
    }
}

impl ColumnLayout {
    /// Total table width: four columns plus the three separating spaces.
    fn total(&self) -> usize {
        self.id + self.dock + self.time + self.destination + 3
    }
}

/// Reduces a free-text dock label to a terse numeric code.
///
/// Blank, "-" or whitespace-only input yields `"--"`; otherwise the decimal
/// digits found anywhere in the string are kept ("EXT.OUT 64" becomes "64"),
/// falling back to `"--"` when there are none.
pub fn normalize_dock(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return NO_DOCK.to_string();
    }
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        NO_DOCK.to_string()
    } else {
        digits
    }
}

/// One hour's worth of rendered rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourGroup {
    pub hour: u32,
    pub count: usize,
    pub rows: Vec<String>,
}

/// The rendered table: header, rule and hour-groups in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub header: String,
    pub rule: String,
    pub groups: Vec<HourGroup>,
}

impl RenderedTable {
    /// Flattens the table into display lines, one blank line before each
    /// hour-group heading.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![self.header.clone(), self.rule.clone()];
        for group in &self.groups {
            out.push(String::new());
            out.push(format!("[{} LTs at {:02}h]", group.count, group.hour));
            out.extend(group.rows.iter().cloned());
        }
        out
    }
}

/// Renders the windowed records into hour-grouped, width-aligned rows.
///
/// Records are ordered by scheduled time (ties broken by destination), and
/// groups follow the first-seen order of their hour while scanning that
/// ordering. A window spanning midnight therefore renders 23h before 00h
/// instead of numerically sorting the hours.
pub fn render(records: &[TripRecord], now: NaiveDateTime, layout: &ColumnLayout) -> RenderedTable {
    let mut sorted: Vec<&TripRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.scheduled_time
            .cmp(&b.scheduled_time)
            .then_with(|| a.destination.cmp(&b.destination))
    });

    let header = format!(
        "{} {} {} {}",
        pad_left("LT", layout.id),
        pad_center("DOCK", layout.dock),
        pad_center("CPT", layout.time),
        pad_left("DESTINATION", layout.destination),
    )
    .trim_end()
    .to_string();
    let rule = "-".repeat(layout.total());

    let mut groups: Vec<HourGroup> = Vec::new();
    for record in sorted {
        let hour = record.scheduled_time.hour();
        let row = render_row(record, now, layout);
        match groups.iter_mut().find(|g| g.hour == hour) {
            Some(group) => {
                group.count += 1;
                group.rows.push(row);
            }
            None => groups.push(HourGroup {
                hour,
                count: 1,
                rows: vec![row],
            }),
        }
    }

    RenderedTable {
        header,
        rule,
        groups,
    }
}

fn render_row(record: &TripRecord, now: NaiveDateTime, layout: &ColumnLayout) -> String {
    let id = clip(record.id.trim(), layout.id);
    let dock = clip(&normalize_dock(&record.dock_raw), layout.dock);
    let time = record.scheduled_time.format("%H:%M").to_string();
    let destination = clip(record.destination.trim(), layout.destination);

    let mut line = format!(
        "{} {} {} {}",
        pad_left(&id, layout.id),
        pad_center(&dock, layout.dock),
        pad_center(&time, layout.time),
        pad_left(&destination, layout.destination),
    );
    if let Some(marker) = urgency(record.scheduled_time, now) {
        line.push(' ');
        line.push(marker);
    }
    line.trim_end().to_string()
}

/// Presentation-only urgency marker: `!` for already due, `*` for due within
/// the imminent threshold. Never affects inclusion or ordering.
fn urgency(scheduled: NaiveDateTime, now: NaiveDateTime) -> Option<char> {
    let delta = scheduled.signed_duration_since(now);
    if delta < Duration::zero() {
        Some('!')
    } else if delta <= Duration::minutes(IMMINENT_MINUTES) {
        Some('*')
    } else {
        None
    }
}

/// Truncates to `width` characters, marking the cut with a trailing `…`.
fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - len))
}

fn pad_center(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{s}{}", " ".repeat(left), " ".repeat(right))
}
