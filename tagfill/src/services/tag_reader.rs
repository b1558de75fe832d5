//! Tag reader
//!
//! Extracts title, artist, album and year from a file's embedded tags.
//!
//! - MP3: ID3v2 frames via the `id3` crate (TIT2, TPE1, TALB, year from
//!   TDRC, falling back to TYER only when TDRC is absent)
//! - FLAC / Ogg Vorbis: Vorbis comments via lofty (title, artist, album, date)

use crate::error::TagError;
use crate::types::{AudioFile, AudioFormat, MetadataRecord};
use id3::TagLike;
use lofty::file::TaggedFileExt;
use lofty::tag::ItemKey;
use std::path::Path;
use tracing::{debug, error};

/// ID3v2 frame identifiers for the four logical fields
pub mod id3_frames {
    pub const TITLE: &str = "TIT2";
    pub const ARTIST: &str = "TPE1";
    pub const ALBUM: &str = "TALB";
    /// ID3v2.4 recording time
    pub const RECORDING_TIME: &str = "TDRC";
    /// ID3v2.3 year (legacy)
    pub const YEAR: &str = "TYER";
}

/// Reads existing metadata from audio files
#[derive(Debug, Default, Clone, Copy)]
pub struct TagReader;

impl TagReader {
    pub fn new() -> Self {
        Self
    }

    /// Read metadata, degrading to an all-placeholder record on failure
    ///
    /// Never fails: corrupt or unreadable files are logged at error level and
    /// reported as fully unresolved.
    pub fn read(&self, file: &AudioFile) -> MetadataRecord {
        match self.try_read(file) {
            Ok(record) => record,
            Err(e) => {
                error!(
                    file = %file.path().display(),
                    error = %e,
                    "Failed to retrieve metadata"
                );
                MetadataRecord::placeholders()
            }
        }
    }

    /// Read metadata, reporting container failures to the caller
    pub fn try_read(&self, file: &AudioFile) -> Result<MetadataRecord, TagError> {
        let record = match file.format() {
            AudioFormat::Mp3 => read_id3(file.path())?,
            AudioFormat::Flac | AudioFormat::OggVorbis => read_vorbis_comments(file.path())?,
        };

        debug!(
            file = %file.path().display(),
            format = file.format().as_str(),
            metadata = %record,
            "Read existing tags"
        );

        Ok(record)
    }
}

fn read_id3(path: &Path) -> Result<MetadataRecord, TagError> {
    let tag = match id3::Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => {
            debug!(file = %path.display(), "No ID3 tag present");
            return Ok(MetadataRecord::placeholders());
        }
        Err(e) => return Err(e.into()),
    };

    let text = |id: &str| {
        tag.get(id)
            .and_then(|frame| frame.content().text())
            .map(first_value)
    };

    // TYER is consulted only when TDRC is absent altogether
    let year = if tag.get(id3_frames::RECORDING_TIME).is_some() {
        text(id3_frames::RECORDING_TIME)
    } else {
        text(id3_frames::YEAR)
    };

    Ok(MetadataRecord::from_parts(
        text(id3_frames::TITLE),
        text(id3_frames::ARTIST),
        text(id3_frames::ALBUM),
        year,
    ))
}

fn read_vorbis_comments(path: &Path) -> Result<MetadataRecord, TagError> {
    let tagged_file = lofty::read_from_path(path)?;

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        debug!(file = %path.display(), "No Vorbis comments present");
        return Ok(MetadataRecord::placeholders());
    };

    let value = |key: &ItemKey| tag.get_string(key).map(str::to_string);

    Ok(MetadataRecord::from_parts(
        value(&ItemKey::TrackTitle),
        value(&ItemKey::TrackArtist),
        value(&ItemKey::AlbumTitle),
        value(&ItemKey::RecordingDate),
    ))
}

/// ID3v2.4 separates multiple text values with NUL; keep the first
fn first_value(text: &str) -> String {
    text.split('\0').next().unwrap_or_default().to_string()
}
