//! MusicBrainz API client
//!
//! Looks up a recording by MBID with its artist credits and releases.
//! MusicBrainz requires a descriptive User-Agent and allows one request per
//! second.

use crate::utils::RateLimiter;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";
const RATE_LIMIT_MS: u64 = 1000; // 1 request per second

/// MusicBrainz client errors
#[derive(Debug, Error)]
pub enum MBError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Recording not found: {0}")]
    RecordingNotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// MusicBrainz Recording response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MBRecording {
    /// Recording MBID (MusicBrainz ID)
    pub id: String,
    /// Recording title
    pub title: Option<String>,
    /// Recording length in milliseconds
    pub length: Option<u64>,
    /// Artist credits for this recording
    #[serde(rename = "artist-credit", default)]
    pub artist_credit: Vec<MBArtistCredit>,
    /// Releases containing this recording, in registry order
    pub releases: Option<Vec<MBRelease>>,
}

/// MusicBrainz artist credit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MBArtistCredit {
    /// Display name (may differ from artist.name for collaborations)
    pub name: String,
}

/// MusicBrainz release
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MBRelease {
    /// Release MBID (MusicBrainz ID)
    pub id: Option<String>,
    /// Release title
    pub title: Option<String>,
    /// Release date, `YYYY`, `YYYY-MM` or `YYYY-MM-DD` (sometimes empty)
    pub date: Option<String>,
}

/// Recording metadata registry
#[async_trait]
pub trait RecordingRegistry: Send + Sync {
    /// Fetch a recording with its releases
    async fn lookup_recording(&self, mbid: &str) -> Result<MBRecording, MBError>;
}

/// Build the User-Agent MusicBrainz asks clients to send
///
/// Format: `Application/Version ( contact )`
pub fn user_agent(app_name: &str, app_version: &str, contact: Option<&str>) -> String {
    match contact {
        Some(contact) if !contact.trim().is_empty() => {
            format!("{}/{} ( {} )", app_name, app_version, contact.trim())
        }
        _ => format!("{}/{}", app_name, app_version),
    }
}

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl MusicBrainzClient {
    pub fn new(user_agent: &str) -> Result<Self, MBError> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MBError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: RateLimiter::new(RATE_LIMIT_MS),
        })
    }
}

#[async_trait]
impl RecordingRegistry for MusicBrainzClient {
    async fn lookup_recording(&self, mbid: &str) -> Result<MBRecording, MBError> {
        self.rate_limiter.wait().await;

        let url = format!(
            "{}/recording/{}?inc=artist-credits+releases&fmt=json",
            MUSICBRAINZ_BASE_URL, mbid
        );

        tracing::debug!(mbid = %mbid, url = %url, "Querying MusicBrainz API");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| MBError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(MBError::RecordingNotFound(mbid.to_string()));
        }

        if status == 503 {
            return Err(MBError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MBError::ApiError(status.as_u16(), error_text));
        }

        let recording: MBRecording = response
            .json()
            .await
            .map_err(|e| MBError::ParseError(e.to_string()))?;

        tracing::debug!(recording = ?recording, "MusicBrainz results");
        tracing::info!(
            mbid = %mbid,
            title = recording.title.as_deref().unwrap_or("Unknown"),
            releases = recording.releases.as_ref().map(|r| r.len()).unwrap_or(0),
            "Retrieved recording from MusicBrainz"
        );

        Ok(recording)
    }
}
