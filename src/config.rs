//! Runtime configuration for one report run.
//!
//! These are the fully merged values the pipeline consumes. The YAML-facing
//! mirror structs and the env-secret merge live in `load_config`.

use chrono_tz::Tz;
use tracing::{debug, info};

use crate::creds::Credentials;
use crate::table::ColumnLayout;

/// Everything one report run needs, assembled by `load_config`.
#[derive(Debug)]
pub struct RunConfig {
    pub sheet: SheetConfig,
    pub report: ReportConfig,
    pub delivery: DeliveryConfig,
}

impl RunConfig {
    pub fn trace_loaded(&self) {
        info!(
            spreadsheet_id = %self.sheet.spreadsheet_id,
            tab = %self.sheet.tab,
            timezone = %self.report.timezone,
            window_hours = self.report.window_hours,
            chunk_limit = self.delivery.chunk_limit,
            "loaded run config"
        );
        debug!(report = ?self.report, delivery = ?self.delivery, "run config (full debug)");
    }
}

/// Where the trip rows come from.
#[derive(Debug)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    /// Worksheet tab holding the cleaned pending base.
    pub tab: String,
    /// Cell range in A1 notation, e.g. "A:F".
    pub range: String,
    pub credentials: Credentials,
}

/// How the report is built.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Reference timezone for computing "now"; all timestamps are compared
    /// naively in this zone.
    pub timezone: Tz,
    pub window_hours: i64,
    pub layout: ColumnLayout,
}

/// How the report is delivered.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub webhook_url: String,
    /// Maximum chunk length accepted by the channel, in bytes.
    pub chunk_limit: usize,
    /// Fixed delay between successive chunk sends, for channel rate limits.
    pub pacing_ms: u64,
}
