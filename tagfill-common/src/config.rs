//! Configuration file loading
//!
//! The TOML file is the lowest-priority configuration tier. Command-line
//! flags and environment variables are resolved by the binary on top of it.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default log level when neither RUST_LOG, the CLI, nor the TOML file set one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`
///
/// Every field is optional here; required values are enforced after all
/// tiers are merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// AcoustID application API key
    pub acoustid_api_key: Option<String>,
    /// Application name reported to MusicBrainz
    pub app_name: Option<String>,
    /// Application version reported to MusicBrainz
    pub app_version: Option<String>,
    /// Root directory to scan for audio files
    pub scan_directory: Option<PathBuf>,
    /// Contact URL or e-mail for the MusicBrainz User-Agent
    pub contact: Option<String>,
    /// Path to the Chromaprint `fpcalc` binary
    pub fpcalc_path: Option<PathBuf>,
    /// Check each field only against its own placeholder
    #[serde(default)]
    pub strict_placeholders: bool,
    /// Write tags to a temp copy and rename over the original
    #[serde(default)]
    pub atomic_writes: bool,
    /// Log the tags that would be written without saving
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` table
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Validate a configuration value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "Loaded TOML config");
    Ok(config)
}

/// Resolve the TOML tier
///
/// An explicitly requested file must exist and parse. Otherwise the
/// platform default location is used when present, and a missing default
/// file simply means the tier is empty.
pub fn resolve_config_file(cli_path: Option<&Path>) -> Result<Option<TomlConfig>> {
    if let Some(path) = cli_path {
        return load_toml_config(path).map(Some);
    }

    match default_config_path() {
        Some(path) => load_toml_config(&path).map(Some),
        None => Ok(None),
    }
}

/// Locate the default config file for the platform, if one exists
///
/// Linux checks `~/.config/tagfill/config.toml` then `/etc/tagfill/config.toml`;
/// other platforms use the user config directory only.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("tagfill").join("config.toml"));
    if let Some(path) = user_config {
        if path.is_file() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/tagfill/config.toml");
        if system_config.is_file() {
            return Some(system_config);
        }
    }

    None
}
