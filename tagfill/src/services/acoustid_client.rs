//! AcoustID API client
//!
//! Resolves a Chromaprint fingerprint to ranked results, each carrying the
//! MusicBrainz recordings it matched.

use crate::utils::RateLimiter;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const ACOUSTID_BASE_URL: &str = "https://api.acoustid.org/v2/lookup";
const RATE_LIMIT_MS: u64 = 334; // 3 requests per second (~333ms between requests)

/// AcoustID client errors
#[derive(Debug, Error)]
pub enum AcoustIDError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("No matches found for fingerprint")]
    NoMatches,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid API key")]
    InvalidApiKey,
}

/// AcoustID lookup response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AcoustIDResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<AcoustIDResult>,
    pub error: Option<AcoustIDApiError>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcoustIDResult {
    pub id: String, // AcoustID
    #[serde(default)]
    pub score: f64, // Match confidence (0.0 to 1.0)
    pub recordings: Option<Vec<AcoustIDRecording>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AcoustIDRecording {
    pub id: Option<String>, // MusicBrainz Recording MBID
    pub title: Option<String>,
    pub artists: Option<Vec<AcoustIDArtist>>,
    pub duration: Option<f64>, // Seconds
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcoustIDArtist {
    pub id: Option<String>, // MusicBrainz Artist MBID
    pub name: String,
}

/// Error body returned with `"status": "error"`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcoustIDApiError {
    pub code: Option<i64>,
    pub message: String,
}

/// Fingerprint identification service
#[async_trait]
pub trait IdentificationService: Send + Sync {
    /// Submit (api key, fingerprint, duration) and return the ranked results
    async fn lookup(
        &self,
        api_key: &str,
        fingerprint: &str,
        duration_seconds: f64,
    ) -> Result<AcoustIDResponse, AcoustIDError>;
}

/// AcoustID API client
pub struct AcoustIDClient {
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl AcoustIDClient {
    pub fn new(user_agent: &str) -> Result<Self, AcoustIDError> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AcoustIDError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: RateLimiter::new(RATE_LIMIT_MS),
        })
    }
}

#[async_trait]
impl IdentificationService for AcoustIDClient {
    async fn lookup(
        &self,
        api_key: &str,
        fingerprint: &str,
        duration_seconds: f64,
    ) -> Result<AcoustIDResponse, AcoustIDError> {
        self.rate_limiter.wait().await;

        // The API takes whole seconds
        let duration = (duration_seconds as u64).to_string();
        let params = [
            ("client", api_key),
            ("meta", "recordings"),
            ("duration", duration.as_str()),
            ("fingerprint", fingerprint),
        ];

        tracing::debug!(duration_seconds, "Querying AcoustID API");

        let response = self
            .http_client
            .post(ACOUSTID_BASE_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AcoustIDError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(AcoustIDError::InvalidApiKey);
        }

        let body = response
            .text()
            .await
            .map_err(|e| AcoustIDError::NetworkError(e.to_string()))?;

        // Error statuses still carry a JSON error body worth surfacing
        let acoustid_response: AcoustIDResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(AcoustIDError::ApiError(status.as_u16(), body))
            }
            Err(e) => return Err(AcoustIDError::ParseError(e.to_string())),
        };

        tracing::debug!(response = ?acoustid_response, "AcoustID results");

        check_response(status.as_u16(), acoustid_response)
    }
}

/// Map a parsed response onto the client's error taxonomy
fn check_response(
    http_status: u16,
    response: AcoustIDResponse,
) -> Result<AcoustIDResponse, AcoustIDError> {
    if response.status != "ok" {
        let message = response
            .error
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| format!("status {}", response.status));
        if message.to_ascii_lowercase().contains("invalid api key") {
            return Err(AcoustIDError::InvalidApiKey);
        }
        return Err(AcoustIDError::ApiError(http_status, message));
    }

    if response.results.is_empty() {
        return Err(AcoustIDError::NoMatches);
    }

    if let Some(top_result) = response.results.first() {
        tracing::info!(
            acoustid = %top_result.id,
            score = top_result.score,
            recordings = top_result.recordings.as_ref().map(|r| r.len()).unwrap_or(0),
            "AcoustID lookup successful"
        );
    }

    Ok(response)
}
