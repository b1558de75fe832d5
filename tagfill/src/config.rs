//! Configuration resolution for tagfill
//!
//! Priority: command line → environment → TOML file. Command-line flags and
//! environment variables are both carried by [`Args`] (clap reads the `env`
//! fallbacks); the TOML tier comes from `tagfill_common::config`.

use crate::services::musicbrainz_client::user_agent;
use crate::services::tag_writer::WriteMode;
use crate::workflow::PlaceholderMatch;
use clap::Parser;
use std::path::PathBuf;
use tagfill_common::config::{is_valid_value, resolve_config_file, TomlConfig, DEFAULT_LOG_LEVEL};
use tagfill_common::{Error, Result};
use tracing::info;

/// Environment variable for the AcoustID application key
pub const ENV_ACOUSTID_KEY: &str = "ACOUSTID_KEY";
/// Environment variable for the application name
pub const ENV_APP_NAME: &str = "ACOUSTID_NAME";
/// Environment variable for the application version
pub const ENV_APP_VERSION: &str = "ACOUSTID_VERSION";
/// Environment variable for the scan root
pub const ENV_SCAN_DIRECTORY: &str = "SCAN_DIRECTORY";

const DEFAULT_FPCALC: &str = "fpcalc";

/// Command-line arguments for tagfill
#[derive(Parser, Debug, Default)]
#[command(name = "tagfill")]
#[command(about = "Fill in missing audio tags from AcoustID and MusicBrainz")]
#[command(version)]
pub struct Args {
    /// AcoustID application API key
    #[arg(long, env = ENV_ACOUSTID_KEY, hide_env_values = true)]
    pub acoustid_key: Option<String>,

    /// Application name sent to the web services
    #[arg(long, env = ENV_APP_NAME)]
    pub app_name: Option<String>,

    /// Application version sent to the web services
    #[arg(long, env = ENV_APP_VERSION)]
    pub app_version: Option<String>,

    /// Directory to scan for MP3, FLAC and Ogg Vorbis files
    #[arg(long, env = ENV_SCAN_DIRECTORY)]
    pub scan_directory: Option<PathBuf>,

    /// TOML config file (defaults to ~/.config/tagfill/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Contact URL or e-mail for the MusicBrainz User-Agent
    #[arg(long, env = "TAGFILL_CONTACT")]
    pub contact: Option<String>,

    /// Path to the Chromaprint fpcalc binary
    #[arg(long, env = "TAGFILL_FPCALC")]
    pub fpcalc_path: Option<PathBuf>,

    /// Treat a field as missing only when it equals its own placeholder
    #[arg(long)]
    pub strict_placeholders: bool,

    /// Write tags into a temp copy and rename it over the original
    #[arg(long)]
    pub atomic_writes: bool,

    /// Log the tags that would be written without saving them
    #[arg(long)]
    pub dry_run: bool,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, env = "TAGFILL_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Fully resolved configuration, built once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub acoustid_api_key: String,
    pub app_name: String,
    pub app_version: String,
    pub scan_directory: PathBuf,
    pub contact: Option<String>,
    pub fpcalc_path: PathBuf,
    pub placeholder_match: PlaceholderMatch,
    pub write_mode: WriteMode,
    pub dry_run: bool,
    pub log_level: String,
}

impl AppConfig {
    /// Load the TOML tier named by `args` and resolve on top of it
    pub fn load(args: &Args) -> Result<Self> {
        let toml = resolve_config_file(args.config.as_deref())?;
        Self::resolve(args, toml.as_ref())
    }

    /// Merge `args` over the TOML tier
    ///
    /// Every missing required key is reported in a single
    /// [`Error::MissingConfig`], named by its environment variable.
    pub fn resolve(args: &Args, toml: Option<&TomlConfig>) -> Result<Self> {
        let mut missing = Vec::new();

        let acoustid_api_key = pick(
            args.acoustid_key.as_ref(),
            toml.and_then(|t| t.acoustid_api_key.as_ref()),
        );
        let app_name = pick(args.app_name.as_ref(), toml.and_then(|t| t.app_name.as_ref()));
        let app_version = pick(
            args.app_version.as_ref(),
            toml.and_then(|t| t.app_version.as_ref()),
        );
        let scan_directory = args
            .scan_directory
            .clone()
            .or_else(|| toml.and_then(|t| t.scan_directory.clone()))
            .filter(|p| is_valid_value(&p.to_string_lossy()));

        if acoustid_api_key.is_none() {
            missing.push(ENV_ACOUSTID_KEY.to_string());
        }
        if app_name.is_none() {
            missing.push(ENV_APP_NAME.to_string());
        }
        if app_version.is_none() {
            missing.push(ENV_APP_VERSION.to_string());
        }
        if scan_directory.is_none() {
            missing.push(ENV_SCAN_DIRECTORY.to_string());
        }

        let (Some(acoustid_api_key), Some(app_name), Some(app_version), Some(scan_directory)) =
            (acoustid_api_key, app_name, app_version, scan_directory)
        else {
            return Err(Error::MissingConfig(missing));
        };

        let contact = pick(args.contact.as_ref(), toml.and_then(|t| t.contact.as_ref()));
        let fpcalc_path = args
            .fpcalc_path
            .clone()
            .or_else(|| toml.and_then(|t| t.fpcalc_path.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FPCALC));

        let strict = args.strict_placeholders || toml.is_some_and(|t| t.strict_placeholders);
        let atomic = args.atomic_writes || toml.is_some_and(|t| t.atomic_writes);

        let log_level = args
            .log_level
            .clone()
            .filter(|l| is_valid_value(l))
            .or_else(|| toml.map(|t| t.logging.level.clone()))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let config = Self {
            acoustid_api_key,
            app_name,
            app_version,
            scan_directory,
            contact,
            fpcalc_path,
            placeholder_match: if strict {
                PlaceholderMatch::Strict
            } else {
                PlaceholderMatch::Lenient
            },
            write_mode: if atomic {
                WriteMode::Atomic
            } else {
                WriteMode::InPlace
            },
            dry_run: args.dry_run || toml.is_some_and(|t| t.dry_run),
            log_level,
        };

        info!(
            scan_directory = %config.scan_directory.display(),
            placeholder_match = ?config.placeholder_match,
            write_mode = ?config.write_mode,
            dry_run = config.dry_run,
            "Configuration resolved"
        );

        Ok(config)
    }

    /// User-Agent for both web service clients
    pub fn user_agent(&self) -> String {
        user_agent(&self.app_name, &self.app_version, self.contact.as_deref())
    }
}

/// First valid value, highest tier first
fn pick(high: Option<&String>, low: Option<&String>) -> Option<String> {
    high.filter(|v| is_valid_value(v))
        .or_else(|| low.filter(|v| is_valid_value(v)))
        .map(|v| v.trim().to_string())
}
