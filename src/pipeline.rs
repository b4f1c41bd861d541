//! End-to-end report run: fetch → build → split → deliver.
//!
//! Single-threaded, single-pass batch execution against one snapshot of the
//! feed. The only blocking points are the two collaborator calls (row fetch
//! and per-chunk delivery); everything in between is pure computation over
//! the injected "now".
//!
//! Delivery is best-effort per chunk: a rejected chunk is logged and
//! counted, later chunks are still attempted, and the run reports partial
//! success instead of aborting.

use chrono::{NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{error, info, warn};

use crate::chunk::split_message;
use crate::config::{DeliveryConfig, ReportConfig};
use crate::contract::{Notifier, RowSource};
use crate::message;
use crate::sheet;
use crate::shift::Shift;
use crate::summary::summarize;
use crate::table;
use crate::window::{select_window, ReportWindow};

/// Outcome of one report run.
#[derive(Debug)]
pub struct RunReport {
    pub records_total: usize,
    pub records_in_window: usize,
    pub chunks_total: usize,
    pub chunks_delivered: usize,
    pub chunks_failed: usize,
}

/// Current naive wall-clock time in the reference timezone. The pipeline
/// itself takes "now" as a parameter so runs are deterministic under test.
pub fn local_now(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

pub async fn run_report<S, N>(
    report: &ReportConfig,
    delivery: &DeliveryConfig,
    source: &S,
    notifier: &N,
    now: NaiveDateTime,
) -> Result<RunReport, String>
where
    S: RowSource,
    N: Notifier,
{
    info!(%now, "starting report run");

    let rows = source.fetch_rows().await.map_err(|e| {
        error!(error = ?e, "row fetch failed");
        format!("Fetching rows failed: {e}")
    })?;
    let records = sheet::parse_rows(&rows);
    info!(rows = rows.len(), records = records.len(), "parsed trip records");

    let current_shift = Shift::of_hour(now.hour());
    let window = ReportWindow::from_now(now, report.window_hours);
    let windowed = select_window(&records, window);
    info!(
        %current_shift,
        in_window = windowed.len(),
        "classified and windowed records"
    );

    let rendered = if windowed.is_empty() {
        None
    } else {
        Some(table::render(&windowed, now, &report.layout))
    };
    let summary_lines = summarize(&records, current_shift);
    let text = message::assemble(rendered.as_ref(), &summary_lines, report.window_hours);

    let chunks = split_message(&text, delivery.chunk_limit);
    info!(length = text.len(), chunks = chunks.len(), "assembled report");

    let mut delivered = 0usize;
    let mut failed = 0usize;
    for (index, chunk) in chunks.iter().enumerate() {
        if index > 0 && delivery.pacing_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delivery.pacing_ms)).await;
        }
        match notifier.send(chunk).await {
            Ok(()) => {
                delivered += 1;
                info!(chunk = index + 1, length = chunk.len(), "chunk delivered");
            }
            Err(e) => {
                failed += 1;
                warn!(chunk = index + 1, error = ?e, "chunk delivery failed, continuing");
            }
        }
    }

    Ok(RunReport {
        records_total: records.len(),
        records_in_window: windowed.len(),
        chunks_total: chunks.len(),
        chunks_delivered: delivered,
        chunks_failed: failed,
    })
}
