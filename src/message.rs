//! Report assembly.
//!
//! Fixed layout: title, then either the empty-state line or the table inside
//! a literal block, then the summary heading and lines. The table must sit
//! inside a fence pair so the chat client renders it as monospace text
//! instead of reflowing it.

use crate::table::RenderedTable;

/// Literal-block delimiter understood by the chat client's renderer.
pub const FENCE: &str = "```";

const TITLE: &str = "🚛 **Pending LH trips:**";
const SUMMARY_HEADING: &str = "**Shift summary:**";

/// Composes the full report text. `table` is `None` when the window came up
/// empty; the report then carries an explicit empty-state line instead of an
/// empty table.
pub fn assemble(
    table: Option<&RenderedTable>,
    summary_lines: &[String],
    window_hours: i64,
) -> String {
    let mut lines: Vec<String> = vec![TITLE.to_string(), String::new()];

    match table {
        Some(table) => {
            lines.push(FENCE.to_string());
            lines.extend(table.lines());
            lines.push(FENCE.to_string());
        }
        None => {
            let unit = if window_hours == 1 { "hour" } else { "hours" };
            lines.push(format!(
                "✅ No departures in the next {window_hours} {unit}."
            ));
        }
    }

    lines.push(String::new());
    lines.push(SUMMARY_HEADING.to_string());
    lines.extend(summary_lines.iter().cloned());

    lines.join("\n")
}
