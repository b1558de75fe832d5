//! tagfill library interface
//!
//! Fills in missing title/artist/album/year tags on MP3, FLAC and Ogg Vorbis
//! files. Existing tags are read first; incomplete files are identified by
//! acoustic fingerprint (AcoustID) and resolved against MusicBrainz before
//! the merged record is written back.

pub mod config;
pub mod error;
pub mod services;
pub mod types;
pub mod utils;
pub mod workflow;

pub use crate::config::{AppConfig, Args};
pub use crate::error::{LookupFailure, TagError};
pub use crate::types::{AudioFile, AudioFormat, Field, MetadataRecord};
pub use crate::workflow::{BatchSummary, FileOutcome, Pipeline, PipelineConfig, Resolution};
