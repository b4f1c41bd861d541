//! Google Sheets row source and row-to-record parsing.
//!
//! The client is a thin wrapper over the `values.get` REST endpoint; the
//! interesting part is `parse_rows`, which applies the feed's cleaning
//! rules: day-before-month timestamps, blank trip ids dropped, unparseable
//! timestamps dropped.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::SheetConfig;
use crate::contract::{FetchError, RawRow, RowSource, TripRecord};
use crate::creds::Credentials;

/// Accepted `CPT` timestamp shapes, day before month as the feed writes
/// them.
const CPT_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M", "%d/%m/%Y %H:%M:%S"];

/// Required feed columns, located by name in the header row.
const COL_DOCK: &str = "Doca";
const COL_TRIP: &str = "LH Trip Number";
const COL_STATION: &str = "Station Name";
const COL_CPT: &str = "CPT";

pub struct SheetsClient {
    http: Client,
    spreadsheet_id: String,
    tab: String,
    range: String,
    credentials: Credentials,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            http: Client::new(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            tab: config.tab.clone(),
            range: config.range.clone(),
            credentials: config.credentials.clone(),
        }
    }

    fn values_url(&self) -> String {
        format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}!{}",
            self.spreadsheet_id, self.tab, self.range
        )
    }
}

#[async_trait]
impl RowSource for SheetsClient {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>, FetchError> {
        let url = reqwest::Url::parse(&self.values_url())?;
        let mut request = self.http.get(url);
        if let Some(token) = &self.credentials.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(key) = &self.credentials.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(format!("Sheets API returned {status}: {body}").into());
        }

        let range: ValueRange = response.json().await?;
        let mut values = range.values.into_iter();
        let header = values
            .next()
            .ok_or("sheet returned no rows, expected at least a header")?;

        let dock = column_index(&header, COL_DOCK)?;
        let trip = column_index(&header, COL_TRIP)?;
        let station = column_index(&header, COL_STATION)?;
        let cpt = column_index(&header, COL_CPT)?;

        let rows: Vec<RawRow> = values
            .map(|cells| RawRow {
                dock_raw: cell(&cells, dock),
                trip_id: cell(&cells, trip),
                destination: cell(&cells, station),
                cpt_raw: cell(&cells, cpt),
            })
            .collect();
        info!(tab = %self.tab, rows = rows.len(), "fetched sheet rows");
        Ok(rows)
    }
}

fn column_index(header: &[String], name: &str) -> Result<usize, FetchError> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| format!("sheet header is missing column {name:?}").into())
}

fn cell(cells: &[String], index: usize) -> String {
    cells.get(index).cloned().unwrap_or_default()
}

/// Turns raw rows into trip records, dropping the rows the report must not
/// see: blank trip ids and timestamps that do not parse.
pub fn parse_rows(rows: &[RawRow]) -> Vec<TripRecord> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let id = row.trip_id.trim();
        if id.is_empty() {
            warn!(cpt = %row.cpt_raw, "dropping row with blank trip id");
            continue;
        }
        match parse_cpt(&row.cpt_raw) {
            Some(scheduled_time) => records.push(TripRecord {
                id: id.to_string(),
                dock_raw: row.dock_raw.clone(),
                destination: row.destination.trim().to_string(),
                scheduled_time,
            }),
            None => warn!(trip = id, cpt = %row.cpt_raw, "dropping row with unparseable CPT"),
        }
    }
    records
}

/// Parses a CPT cell, day before month.
pub fn parse_cpt(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    CPT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}
