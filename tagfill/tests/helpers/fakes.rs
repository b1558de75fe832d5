//! In-memory service fakes
//!
//! Each fake counts its calls so tests can assert which stages ran.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tagfill::services::acoustid_client::{
    AcoustIDArtist, AcoustIDError, AcoustIDRecording, AcoustIDResponse, AcoustIDResult,
    IdentificationService,
};
use tagfill::services::fingerprinter::{FingerprintError, FingerprintSource};
use tagfill::services::musicbrainz_client::{MBError, MBRecording, MBRelease, RecordingRegistry};
use tagfill::types::FingerprintResult;

/// Fingerprint source returning a fixed result, or failing
pub struct FakeFingerprinter {
    result: Option<FingerprintResult>,
    calls: AtomicUsize,
}

impl FakeFingerprinter {
    pub fn returning(duration: f64, fingerprint: &str) -> Self {
        Self {
            result: Some(FingerprintResult {
                duration,
                fingerprint: fingerprint.to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FingerprintSource for FakeFingerprinter {
    async fn fingerprint(&self, _path: &Path) -> Result<FingerprintResult, FingerprintError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().ok_or(FingerprintError::EmptyFingerprint)
    }
}

/// Identification service returning one recording, or no results
pub struct FakeIdentification {
    recording: Option<AcoustIDRecording>,
    calls: AtomicUsize,
}

impl FakeIdentification {
    pub fn matching(recording_id: Option<&str>, title: &str, artist: &str) -> Self {
        Self {
            recording: Some(AcoustIDRecording {
                id: recording_id.map(str::to_string),
                title: Some(title.to_string()),
                artists: Some(vec![AcoustIDArtist {
                    id: None,
                    name: artist.to_string(),
                }]),
                duration: None,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn no_results() -> Self {
        Self {
            recording: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentificationService for FakeIdentification {
    async fn lookup(
        &self,
        _api_key: &str,
        _fingerprint: &str,
        _duration_seconds: f64,
    ) -> Result<AcoustIDResponse, AcoustIDError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let recording = self.recording.clone().ok_or(AcoustIDError::NoMatches)?;
        Ok(AcoustIDResponse {
            status: "ok".to_string(),
            results: vec![AcoustIDResult {
                id: "acoustid-1".to_string(),
                score: 0.97,
                recordings: Some(vec![recording]),
            }],
            error: None,
        })
    }
}

/// Registry returning fixed releases, or failing
pub struct FakeRegistry {
    releases: Option<Vec<(String, String)>>,
    calls: AtomicUsize,
}

impl FakeRegistry {
    /// Releases as (title, date) pairs, in registry order
    pub fn with_releases(releases: &[(&str, &str)]) -> Self {
        Self {
            releases: Some(
                releases
                    .iter()
                    .map(|(t, d)| (t.to_string(), d.to_string()))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            releases: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordingRegistry for FakeRegistry {
    async fn lookup_recording(&self, mbid: &str) -> Result<MBRecording, MBError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let releases = self
            .releases
            .as_ref()
            .ok_or_else(|| MBError::NetworkError("connection refused".to_string()))?;

        Ok(MBRecording {
            id: mbid.to_string(),
            releases: Some(
                releases
                    .iter()
                    .map(|(title, date)| MBRelease {
                        id: None,
                        title: Some(title.clone()),
                        date: Some(date.clone()),
                    })
                    .collect(),
            ),
            ..Default::default()
        })
    }
}
