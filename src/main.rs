use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

mod backup;
mod config;
mod db;
mod http;
mod logging;
mod record;
mod sheets;
#[cfg(test)]
mod test_utils;

use crate::backup::FormBackup;
use crate::db::MongoDatabase;
use crate::http::AppState;
use crate::record::Recorder;
use crate::sheets::GoogleSheets;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: String,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match config::load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    let _log_guard = logging::init_logging(config.logging.as_ref(), cli.verbose)?;

    info!("Practice tracker v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from: {}", cli.config);

    let database = Arc::new(
        MongoDatabase::new(&config.database)
            .await
            .context("Failed to connect to the document store")?,
    );

    let sheets = Arc::new(
        GoogleSheets::new(&config.sheets).context("Failed to create the sheet client")?,
    );

    let backup = Arc::new(
        FormBackup::new(&config.backup).context("Failed to create the backup channel")?,
    );

    let recorder = Arc::new(Recorder::new(
        database.clone(),
        sheets,
        backup,
        Duration::from_secs(config.sheets.timeout_seconds),
    ));

    let state = AppState {
        recorder,
        database,
        github: config.github.clone(),
        http: reqwest::Client::new(),
    };

    if let Err(e) = http::serve(state, &config.server).await {
        error!("Server failed: {:#}", e);
        process::exit(1);
    }

    Ok(())
}
