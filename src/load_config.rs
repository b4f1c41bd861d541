//! Loads the static YAML config and merges in secrets from the environment.
//!
//! The YAML file carries no secrets; `SPREADSHEET_ID`, `SEATALK_WEBHOOK_URL`
//! and `GOOGLE_SHEETS_CREDENTIALS` come from the environment (a local .env
//! is honoured via dotenvy in main).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{DeliveryConfig, ReportConfig, RunConfig, SheetConfig};
use crate::creds::decode_credentials;
use crate::table::ColumnLayout;

#[derive(Deserialize, Default)]
#[serde(default)]
struct StaticConfig {
    sheet: SheetSection,
    report: ReportSection,
    delivery: DeliverySection,
}

#[derive(Deserialize)]
#[serde(default)]
struct SheetSection {
    tab: String,
    range: String,
}

impl Default for SheetSection {
    fn default() -> Self {
        Self {
            tab: "Base Pending Tratado".to_string(),
            range: "A:F".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct ReportSection {
    timezone: String,
    window_hours: i64,
    layout: ColumnLayout,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            timezone: "America/Sao_Paulo".to_string(),
            window_hours: 2,
            layout: ColumnLayout::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct DeliverySection {
    chunk_limit: usize,
    pacing_ms: u64,
}

impl Default for DeliverySection {
    fn default() -> Self {
        Self {
            chunk_limit: 3000,
            pacing_ms: 1000,
        }
    }
}

/// Loads the static YAML config file and injects required env vars for
/// secrets. Returns a fully merged `RunConfig` or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "loading configuration from file");

    let content = fs::read_to_string(path_ref)
        .with_context(|| format!("failed to read config file {path_ref:?}"))?;
    let static_conf: StaticConfig =
        serde_yaml::from_str(&content).context("failed to parse config YAML")?;

    let timezone: Tz = static_conf.report.timezone.parse().map_err(|e| {
        error!(timezone = %static_conf.report.timezone, "invalid timezone in config");
        anyhow::anyhow!("invalid timezone {:?}: {e}", static_conf.report.timezone)
    })?;

    let spreadsheet_id = require_env("SPREADSHEET_ID")?;
    let webhook_url = require_env("SEATALK_WEBHOOK_URL")?;
    let creds_raw = require_env("GOOGLE_SHEETS_CREDENTIALS")?;
    let credentials = decode_credentials(&creds_raw).map_err(|e| {
        error!(error = %e, "failed to decode GOOGLE_SHEETS_CREDENTIALS");
        anyhow::anyhow!("failed to decode GOOGLE_SHEETS_CREDENTIALS: {e}")
    })?;

    let config = RunConfig {
        sheet: SheetConfig {
            spreadsheet_id,
            tab: static_conf.sheet.tab,
            range: static_conf.sheet.range,
            credentials,
        },
        report: ReportConfig {
            timezone,
            window_hours: static_conf.report.window_hours,
            layout: static_conf.report.layout,
        },
        delivery: DeliveryConfig {
            webhook_url,
            chunk_limit: static_conf.delivery.chunk_limit,
            pacing_ms: static_conf.delivery.pacing_ms,
        },
    };
    config.trace_loaded();
    Ok(config)
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|e| {
        error!(var = name, "required environment variable not set");
        anyhow::anyhow!("{name} environment variable not set: {e}")
    })
}
