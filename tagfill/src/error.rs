//! Error types for tagfill
//!
//! Service clients keep their own error enums next to the client. This
//! module holds the two types the pipeline reasons about directly: tag I/O
//! failures and the enumerated reasons an external lookup can be abandoned.

use std::path::PathBuf;
use thiserror::Error;

/// Tag read/write errors
#[derive(Debug, Error)]
pub enum TagError {
    /// ID3v2 tag could not be read or written (MP3)
    #[error("ID3 error: {0}")]
    Id3(#[from] id3::Error),

    /// Container-level failure from lofty (FLAC, Ogg Vorbis)
    #[error("Tag container error: {0}")]
    Container(#[from] lofty::error::LoftyError),

    /// I/O error (temp copy, rename)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Year cannot be stored in the legacy TYER frame
    #[error("Invalid legacy year value: {0:?} (expected four digits)")]
    InvalidLegacyYear(String),

    /// File type has no writable tag container
    #[error("No tag container available for {}", .0.display())]
    NoTagContainer(PathBuf),
}

/// Reason an identification attempt was abandoned for one file
///
/// Every variant is recoverable: the file continues to MERGE with its
/// original tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupFailure {
    /// Fingerprint or duration missing, or fingerprinting failed
    #[error("No usable fingerprint: {0}")]
    NoFingerprint(String),

    /// Identification service request failed or returned an error status
    #[error("Identification service error: {0}")]
    IdentificationService(String),

    /// Identification service returned an empty result list
    #[error("No identification results")]
    NoResults,

    /// Top identification result carried no recordings
    #[error("No recordings in identification results")]
    NoRecordings,

    /// Metadata registry request failed
    #[error("Metadata registry error: {0}")]
    Registry(String),
}
