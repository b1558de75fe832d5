//! Pipeline Orchestrator
//!
//! Runs each file through READ → (COMPLETE | IDENTIFY) → MERGE → WRITE.
//!
//! # Error Handling
//! - Per-file isolation: a lookup or write failure never stops the batch
//! - Graceful degradation: a failed lookup merges the tags already in the file
//! - The final write happens for every file, complete or not
//!
//! # Example
//! ```rust,ignore
//! let pipeline = Pipeline::from_config(&config)?;
//! let summary = pipeline.run(&files).await;
//! ```

use super::policy::{merge, missing_fields, PlaceholderMatch};
use super::statistics::BatchSummary;
use crate::config::AppConfig;
use crate::error::{LookupFailure, TagError};
use crate::services::acoustid_client::{AcoustIDClient, IdentificationService};
use crate::services::fingerprinter::{FingerprintSource, Fingerprinter};
use crate::services::identifier::FingerprintIdentifier;
use crate::services::metadata_resolver::MetadataResolver;
use crate::services::musicbrainz_client::{MusicBrainzClient, RecordingRegistry};
use crate::services::tag_reader::TagReader;
use crate::services::tag_writer::{TagWriter, WriteMode};
use crate::types::{AudioFile, MetadataRecord, RecordingCandidate, ReleaseInfo};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// AcoustID application key for fingerprint lookups
    pub acoustid_api_key: String,
    /// Which placeholders count as missing
    pub placeholder_match: PlaceholderMatch,
    /// In-place or temp-then-rename writes
    pub write_mode: WriteMode,
    /// Skip saving, log only
    pub dry_run: bool,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            acoustid_api_key: config.acoustid_api_key.clone(),
            placeholder_match: config.placeholder_match,
            write_mode: config.write_mode,
            dry_run: config.dry_run,
        }
    }
}

/// Which path a file took through the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No field was missing; no external lookup was made
    Complete,
    /// Identified through the fingerprint service
    Resolved { candidate: RecordingCandidate },
    /// Lookup abandoned; only the read tags were merged
    LookupFailed(LookupFailure),
}

/// Per-file result
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Tags as read from the file
    pub original: MetadataRecord,
    pub resolution: Resolution,
    /// Record handed to the writer
    pub final_record: MetadataRecord,
    /// Set when the final write failed
    pub write_error: Option<TagError>,
}

/// Per-file orchestrator
pub struct Pipeline {
    config: PipelineConfig,
    reader: TagReader,
    identifier: FingerprintIdentifier,
    resolver: MetadataResolver,
    writer: TagWriter,
}

impl Pipeline {
    /// Create pipeline over the given service seams
    pub fn new(
        config: PipelineConfig,
        fingerprinter: Arc<dyn FingerprintSource>,
        identification: Arc<dyn IdentificationService>,
        registry: Arc<dyn RecordingRegistry>,
    ) -> Self {
        let writer = TagWriter::new(config.write_mode).with_dry_run(config.dry_run);
        Self {
            config,
            reader: TagReader::new(),
            identifier: FingerprintIdentifier::new(fingerprinter, identification),
            resolver: MetadataResolver::new(registry),
            writer,
        }
    }

    /// Create pipeline backed by fpcalc, AcoustID and MusicBrainz
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let user_agent = config.user_agent();

        let acoustid =
            AcoustIDClient::new(&user_agent).context("Failed to create AcoustID client")?;
        let musicbrainz =
            MusicBrainzClient::new(&user_agent).context("Failed to create MusicBrainz client")?;

        Ok(Self::new(
            PipelineConfig::from(config),
            Arc::new(Fingerprinter::new(config.fpcalc_path.clone())),
            Arc::new(acoustid),
            Arc::new(musicbrainz),
        ))
    }

    /// Process files strictly one at a time, in the order given
    pub async fn run(&self, files: &[AudioFile]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let total = files.len();

        for (i, file) in files.iter().enumerate() {
            info!(
                file = %file.path().display(),
                format = file.format().as_str(),
                "Processing file {} of {}", i + 1, total
            );
            let outcome = self.process_file(file).await;
            summary.record(&outcome);
        }

        info!("Batch complete: {}", summary.display_string());
        summary
    }

    /// Run one file through the full state machine
    pub async fn process_file(&self, file: &AudioFile) -> FileOutcome {
        let path = file.path();
        let mode = self.config.placeholder_match;

        // READ
        let original = self.reader.read(file);
        info!(file = %path.display(), "Current metadata: {}", original);

        let missing = missing_fields(&original, mode);

        let (resolution, external) = if missing.is_empty() {
            info!(file = %path.display(), "All metadata present, skipping lookup");
            (Resolution::Complete, None)
        } else {
            debug!(file = %path.display(), missing = ?missing, "Metadata incomplete");
            match self.lookup(file).await {
                Ok((candidate, external)) => {
                    (Resolution::Resolved { candidate }, Some(external))
                }
                Err(failure) => (Resolution::LookupFailed(failure), None),
            }
        };

        // MERGE
        let final_record = merge(&original, external.as_ref(), mode);

        // WRITE (failure already logged by the writer)
        let write_error = self.writer.write(file, &final_record).err();

        FileOutcome {
            path: path.to_path_buf(),
            original,
            resolution,
            final_record,
            write_error,
        }
    }

    /// IDENTIFY, then resolve album/year when a recording id is known
    async fn lookup(
        &self,
        file: &AudioFile,
    ) -> std::result::Result<(RecordingCandidate, MetadataRecord), LookupFailure> {
        let candidate = self
            .identifier
            .identify(file, &self.config.acoustid_api_key)
            .await?;

        let release = match candidate.recording_id.as_deref() {
            Some(recording_id) => self.resolver.resolve_by_recording_id(recording_id).await,
            None => {
                debug!(file = %file.path().display(), "No recording id, album/year unresolved");
                ReleaseInfo::placeholders()
            }
        };

        let external = MetadataRecord {
            title: candidate.title.clone(),
            artist: candidate.artist.clone(),
            album: release.album,
            year: release.year,
        };
        info!(file = %file.path().display(), "External metadata: {}", external);

        Ok((candidate, external))
    }
}
