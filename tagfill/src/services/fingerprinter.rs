//! Audio fingerprinting service using Chromaprint
//!
//! Runs the Chromaprint `fpcalc` tool in JSON mode and returns the track
//! duration together with the compressed fingerprint expected by AcoustID.

use crate::types::FingerprintResult;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default fpcalc binary, resolved through PATH
pub const DEFAULT_FPCALC: &str = "fpcalc";

/// Fingerprinting errors
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("fpcalc not found at {0}")]
    ToolUnavailable(PathBuf),

    #[error("fpcalc failed ({status}): {stderr}")]
    ToolFailed { status: String, stderr: String },

    #[error("Failed to parse fpcalc output: {0}")]
    ParseError(String),

    #[error("Fingerprint is empty")]
    EmptyFingerprint,

    #[error("Duration is invalid: {0:?}")]
    InvalidDuration(Option<f64>),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Source of acoustic fingerprints
#[async_trait]
pub trait FingerprintSource: Send + Sync {
    /// Compute (duration, fingerprint) for a file
    async fn fingerprint(&self, path: &Path) -> Result<FingerprintResult, FingerprintError>;
}

#[derive(Debug, Deserialize)]
struct FpcalcOutput {
    duration: Option<f64>,
    fingerprint: Option<String>,
}

/// fpcalc-backed fingerprinter
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    fpcalc_path: PathBuf,
    /// Use first N seconds for fingerprinting (default: 120 seconds)
    duration_seconds: u32,
}

impl Fingerprinter {
    pub fn new(fpcalc_path: impl Into<PathBuf>) -> Self {
        Self {
            fpcalc_path: fpcalc_path.into(),
            duration_seconds: 120, // AcoustID recommends 120 seconds
        }
    }

    /// Parse and validate `fpcalc -json` output
    pub fn parse_output(stdout: &[u8]) -> Result<FingerprintResult, FingerprintError> {
        let output: FpcalcOutput = serde_json::from_slice(stdout)
            .map_err(|e| FingerprintError::ParseError(e.to_string()))?;

        let fingerprint = output
            .fingerprint
            .filter(|f| !f.trim().is_empty())
            .ok_or(FingerprintError::EmptyFingerprint)?;

        let duration = match output.duration {
            Some(d) if d.is_finite() && d > 0.0 => d,
            other => return Err(FingerprintError::InvalidDuration(other)),
        };

        Ok(FingerprintResult {
            duration,
            fingerprint,
        })
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(DEFAULT_FPCALC)
    }
}

#[async_trait]
impl FingerprintSource for Fingerprinter {
    async fn fingerprint(&self, path: &Path) -> Result<FingerprintResult, FingerprintError> {
        let output = tokio::process::Command::new(&self.fpcalc_path)
            .arg("-json")
            .arg("-length")
            .arg(self.duration_seconds.to_string())
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    FingerprintError::ToolUnavailable(self.fpcalc_path.clone())
                }
                _ => FingerprintError::IoError(e),
            })?;

        if !output.status.success() {
            return Err(FingerprintError::ToolFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let result = Self::parse_output(&output.stdout)?;

        tracing::debug!(
            file = %path.display(),
            duration = result.duration,
            fingerprint_length = result.fingerprint.len(),
            "Fingerprint generated"
        );

        Ok(result)
    }
}
