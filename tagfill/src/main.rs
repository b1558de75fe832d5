//! tagfill - Audio tag enrichment
//!
//! Scans a directory for MP3, FLAC and Ogg Vorbis files, identifies files
//! with incomplete tags by acoustic fingerprint, and writes the resolved
//! title/artist/album/year back into each file.

use anyhow::{Context, Result};
use clap::Parser;
use tagfill::services::FileScanner;
use tagfill::{AppConfig, Args, Pipeline};
use tagfill_common::config::{resolve_config_file, DEFAULT_LOG_LEVEL};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    // Parse command-line arguments (env fallbacks included)
    let args = Args::parse();

    // TOML tier is loaded before tracing so it can supply the log level
    let toml = resolve_config_file(args.config.as_deref());
    let level = args
        .log_level
        .clone()
        .or_else(|| {
            toml.as_ref()
                .ok()
                .and_then(|t| t.as_ref())
                .map(|t| t.logging.level.clone())
        })
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tagfill");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match toml.and_then(|toml| AppConfig::resolve(&args, toml.as_ref())) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let files = FileScanner::new()
        .scan(&config.scan_directory)
        .context("Failed to scan music directory")?;
    info!("Found {} audio files", files.len());

    let pipeline = Pipeline::from_config(&config)?;
    pipeline.run(&files).await;

    Ok(())
}
