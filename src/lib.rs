pub mod chunk;
pub mod config;
pub mod contract;
pub mod creds;
pub mod load_config;
pub mod message;
pub mod pipeline;
pub mod sheet;
pub mod shift;
pub mod summary;
pub mod table;
pub mod webhook;
pub mod window;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use load_config::load_config;
use pipeline::{local_now, run_report};

#[derive(Parser)]
#[clap(
    name = "dockwatch",
    version,
    about = "Build a pending outbound-trip report from a spreadsheet feed and post it to a chat webhook"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and deliver one report from the configured sheet
    Report {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Report { config } => {
            let config = load_config(config)?;
            let source = sheet::SheetsClient::new(&config.sheet);
            let notifier = webhook::SeaTalkWebhook::new(config.delivery.webhook_url.clone());
            let now = local_now(config.report.timezone);

            println!("Report starting...");
            match run_report(&config.report, &config.delivery, &source, &notifier, now).await {
                Ok(report) => {
                    println!("Report complete.\nSummary:");
                    println!("{report:#?}");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Report run failed: {e}");
                    Err(anyhow::Error::msg(e))
                }
            }
        }
    }
}
