//! Fingerprint identifier
//!
//! Fingerprints a file and resolves it to the first recording of the first
//! AcoustID result. No re-ranking is applied on top of the service order.

use crate::error::LookupFailure;
use crate::services::acoustid_client::{AcoustIDError, AcoustIDResponse, IdentificationService};
use crate::services::fingerprinter::FingerprintSource;
use crate::types::{AudioFile, RecordingCandidate, UNKNOWN_ARTIST, UNKNOWN_TITLE};
use std::sync::Arc;
use tracing::{debug, error};

/// Resolves audio files to recording candidates
pub struct FingerprintIdentifier {
    fingerprinter: Arc<dyn FingerprintSource>,
    service: Arc<dyn IdentificationService>,
}

impl FingerprintIdentifier {
    pub fn new(
        fingerprinter: Arc<dyn FingerprintSource>,
        service: Arc<dyn IdentificationService>,
    ) -> Self {
        Self {
            fingerprinter,
            service,
        }
    }

    /// Identify `file` using the AcoustID application key `api_key`
    ///
    /// Every failure is logged here and returned as a [`LookupFailure`].
    pub async fn identify(
        &self,
        file: &AudioFile,
        api_key: &str,
    ) -> Result<RecordingCandidate, LookupFailure> {
        let path = file.path();

        let fingerprint = match self.fingerprinter.fingerprint(path).await {
            Ok(fp) => fp,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Error generating fingerprint");
                return Err(LookupFailure::NoFingerprint(e.to_string()));
            }
        };

        let response = match self
            .service
            .lookup(api_key, &fingerprint.fingerprint, fingerprint.duration)
            .await
        {
            Ok(response) => response,
            Err(AcoustIDError::NoMatches) => {
                error!(file = %path.display(), "No AcoustID results found");
                return Err(LookupFailure::NoResults);
            }
            Err(e) => {
                error!(file = %path.display(), error = %e, "AcoustID lookup failed");
                return Err(LookupFailure::IdentificationService(e.to_string()));
            }
        };

        let candidate = select_candidate(&response).inspect_err(|failure| {
            error!(file = %path.display(), "{}", failure);
        })?;

        debug!(
            file = %path.display(),
            title = %candidate.title,
            artist = %candidate.artist,
            recording_id = ?candidate.recording_id,
            "AcoustID candidate"
        );

        Ok(candidate)
    }
}

/// First-match selection: first result, first recording
pub fn select_candidate(response: &AcoustIDResponse) -> Result<RecordingCandidate, LookupFailure> {
    let top = response.results.first().ok_or(LookupFailure::NoResults)?;

    let recording = top
        .recordings
        .as_ref()
        .and_then(|recordings| recordings.first())
        .ok_or(LookupFailure::NoRecordings)?;

    let title = recording
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let artist = recording
        .artists
        .as_ref()
        .and_then(|artists| artists.first())
        .map(|a| a.name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    Ok(RecordingCandidate {
        recording_id: recording.id.clone().filter(|id| !id.is_empty()),
        title,
        artist,
    })
}
