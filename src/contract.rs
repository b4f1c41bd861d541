//! Shared data types and collaborator interfaces.
//!
//! The report engine itself is pure computation; everything that touches the
//! outside world (the spreadsheet feed, the chat webhook) sits behind one of
//! the traits defined here. Both traits are annotated for `mockall` so the
//! pipeline can be exercised end to end with deterministic mocks.

use async_trait::async_trait;
use chrono::NaiveDateTime;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// One raw spreadsheet row, as the feed provides it. No parsing applied.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// Free-text dock field, e.g. "EXT.OUT 64", "-" or blank.
    pub dock_raw: String,
    /// LH trip number; blank rows are dropped during parsing.
    pub trip_id: String,
    /// Destination station name.
    pub destination: String,
    /// Scheduled departure time, day before month, e.g. "10/05/2024 14:05".
    pub cpt_raw: String,
}

/// One scheduled outbound movement, cleaned and parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRecord {
    pub id: String,
    pub dock_raw: String,
    pub destination: String,
    /// Naive local timestamp; all comparisons assume the single reference
    /// timezone the job runs in.
    pub scheduled_time: NaiveDateTime,
}

pub type FetchError = Box<dyn std::error::Error + Send + Sync>;
pub type DeliveryError = Box<dyn std::error::Error + Send + Sync>;

/// Trait for fetching the raw row snapshot the report is built from.
/// Implemented by the Sheets client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch all data rows (header excluded) from the feed.
    async fn fetch_rows(&self) -> Result<Vec<RawRow>, FetchError>;
}

/// Trait for delivering one message chunk to the chat channel.
///
/// Delivery is best-effort per chunk: the pipeline records a failure and
/// moves on, it never aborts the run because one chunk was rejected.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one chunk of the assembled report.
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}
