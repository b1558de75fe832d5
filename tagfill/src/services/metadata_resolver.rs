//! Metadata resolver
//!
//! Fetches album and year for a recording MBID from MusicBrainz. The first
//! listed release is taken as authoritative; its date is truncated to the
//! first four characters rather than parsed.

use crate::error::LookupFailure;
use crate::services::musicbrainz_client::{MBRecording, RecordingRegistry};
use crate::types::{ReleaseInfo, UNKNOWN_ALBUM, UNKNOWN_YEAR};
use std::sync::Arc;
use tracing::{debug, error};

pub struct MetadataResolver {
    registry: Arc<dyn RecordingRegistry>,
}

impl MetadataResolver {
    pub fn new(registry: Arc<dyn RecordingRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve album/year, degrading to placeholders on registry failure
    pub async fn resolve_by_recording_id(&self, recording_id: &str) -> ReleaseInfo {
        match self.try_resolve(recording_id).await {
            Ok(info) => info,
            Err(failure) => {
                error!(
                    recording_id = %recording_id,
                    error = %failure,
                    "Error fetching metadata from MusicBrainz"
                );
                ReleaseInfo::placeholders()
            }
        }
    }

    /// Resolve album/year, reporting registry failures to the caller
    pub async fn try_resolve(&self, recording_id: &str) -> Result<ReleaseInfo, LookupFailure> {
        let recording = self
            .registry
            .lookup_recording(recording_id)
            .await
            .map_err(|e| LookupFailure::Registry(e.to_string()))?;

        let info = release_info(&recording);
        debug!(
            recording_id = %recording_id,
            album = %info.album,
            year = %info.year,
            "MusicBrainz metadata"
        );
        Ok(info)
    }
}

/// Album and year from the recording's first release
pub fn release_info(recording: &MBRecording) -> ReleaseInfo {
    let Some(release) = recording.releases.as_ref().and_then(|r| r.first()) else {
        return ReleaseInfo::placeholders();
    };

    let album = release
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

    let year = release
        .date
        .as_deref()
        .map(|date| date.trim().chars().take(4).collect::<String>())
        .filter(|year| !year.is_empty())
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string());

    ReleaseInfo { album, year }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::musicbrainz_client::{MBError, MBRelease};
    use async_trait::async_trait;

    fn release(title: Option<&str>, date: Option<&str>) -> MBRelease {
        MBRelease {
            id: None,
            title: title.map(str::to_string),
            date: date.map(str::to_string),
        }
    }

    fn recording(releases: Option<Vec<MBRelease>>) -> MBRecording {
        MBRecording {
            id: "mbid".to_string(),
            title: Some("One More Time".to_string()),
            releases,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_release_is_authoritative() {
        let rec = recording(Some(vec![
            release(Some("Discovery"), Some("1999-03-01")),
            release(Some("Alive 2007"), Some("2005-07-20")),
        ]));
        assert_eq!(
            release_info(&rec),
            ReleaseInfo {
                album: "Discovery".to_string(),
                year: "1999".to_string(),
            }
        );
    }

    #[test]
    fn test_year_only_date() {
        let rec = recording(Some(vec![release(Some("Discovery"), Some("2001"))]));
        assert_eq!(release_info(&rec).year, "2001");
    }

    #[test]
    fn test_missing_date_and_title() {
        let rec = recording(Some(vec![release(None, None)]));
        assert_eq!(release_info(&rec), ReleaseInfo::placeholders());

        let rec = recording(Some(vec![release(Some("Discovery"), Some(""))]));
        assert_eq!(release_info(&rec).year, UNKNOWN_YEAR);
    }

    #[test]
    fn test_no_releases() {
        assert_eq!(release_info(&recording(None)), ReleaseInfo::placeholders());
        assert_eq!(release_info(&recording(Some(vec![]))), ReleaseInfo::placeholders());
    }

    struct FailingRegistry;

    #[async_trait]
    impl RecordingRegistry for FailingRegistry {
        async fn lookup_recording(&self, mbid: &str) -> Result<MBRecording, MBError> {
            Err(MBError::RecordingNotFound(mbid.to_string()))
        }
    }

    #[tokio::test]
    async fn test_registry_failure_degrades_to_placeholders() {
        let resolver = MetadataResolver::new(Arc::new(FailingRegistry));

        assert!(matches!(
            resolver.try_resolve("mbid").await,
            Err(LookupFailure::Registry(_))
        ));
        assert_eq!(
            resolver.resolve_by_recording_id("mbid").await,
            ReleaseInfo::placeholders()
        );
    }
}
