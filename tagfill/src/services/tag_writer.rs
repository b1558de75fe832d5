//! Tag writer
//!
//! Serializes a resolved [`MetadataRecord`] back into the file's tags.
//!
//! - MP3: creates an ID3v2 tag if absent, sets TIT2/TPE1/TALB/TDRC and
//!   attempts the legacy TYER frame. A TYER failure is logged and the rest
//!   of the write proceeds.
//! - FLAC / Ogg Vorbis: sets the title, artist, album and date comments.
//!   A FLAC stream whose last metadata block is not PADDING gets an empty
//!   PADDING block appended first, so the comment block can be inserted
//!   without touching STREAMINFO or the audio frames.
//!
//! Failures are returned to the caller after being logged; they are never
//! retried.

use crate::error::TagError;
use crate::services::tag_reader::id3_frames;
use crate::types::{AudioFile, AudioFormat, MetadataRecord};
use id3::{TagLike, Version};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::tag::{ItemKey, Tag, TagExt};
use std::path::Path;
use tracing::{debug, error, info};

/// How tag changes reach the file on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Mutate the file directly. A failure part-way leaves a partial write.
    #[default]
    InPlace,
    /// Write into a temp copy in the same directory, then rename it over the
    /// original. A failure leaves the original untouched.
    Atomic,
}

/// Writes metadata records into audio files
#[derive(Debug, Clone, Default)]
pub struct TagWriter {
    mode: WriteMode,
    dry_run: bool,
}

impl TagWriter {
    pub fn new(mode: WriteMode) -> Self {
        Self {
            mode,
            dry_run: false,
        }
    }

    /// Log the tags that would be written instead of saving them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Write `record` into `file`
    pub fn write(&self, file: &AudioFile, record: &MetadataRecord) -> Result<(), TagError> {
        info!(
            file = %file.path().display(),
            "Tags to write: {}", record
        );

        if self.dry_run {
            info!(file = %file.path().display(), "Dry run, not saving");
            return Ok(());
        }

        let result = match self.mode {
            WriteMode::InPlace => write_tags(file.path(), file.format(), record),
            WriteMode::Atomic => write_atomic(file, record),
        };

        match &result {
            Ok(()) => info!(file = %file.path().display(), "Metadata written"),
            Err(e) => error!(
                file = %file.path().display(),
                error = %e,
                "Failed to write metadata"
            ),
        }

        result
    }
}

fn write_atomic(file: &AudioFile, record: &MetadataRecord) -> Result<(), TagError> {
    let path = file.path();
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    // Keep the extension so lofty can still pick the file type from the name
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let temp = tempfile::Builder::new()
        .prefix(".tagfill-")
        .suffix(&suffix)
        .tempfile_in(parent)?;

    std::fs::copy(path, temp.path())?;
    write_tags(temp.path(), file.format(), record)?;
    temp.persist(path).map_err(|e| TagError::Io(e.error))?;

    debug!(file = %path.display(), "Atomic write committed");
    Ok(())
}

fn write_tags(path: &Path, format: AudioFormat, record: &MetadataRecord) -> Result<(), TagError> {
    match format {
        AudioFormat::Mp3 => write_id3(path, record),
        AudioFormat::Flac => {
            ensure_trailing_padding(path)?;
            write_vorbis_comments(path, record)
        }
        AudioFormat::OggVorbis => write_vorbis_comments(path, record),
    }
}

const FLAC_MARKER: &[u8; 4] = b"fLaC";
const FLAC_BLOCK_HEADER_LEN: usize = 4;
const FLAC_LAST_BLOCK: u8 = 0x80;
const FLAC_BLOCK_PADDING: u8 = 1;

/// Header offset and end offset of the last FLAC metadata block.
///
/// `None` unless `bytes` starts with `fLaC` followed by a complete block chain.
fn last_metadata_block(bytes: &[u8]) -> Option<(usize, usize)> {
    if !bytes.starts_with(FLAC_MARKER) {
        return None;
    }

    let mut offset = FLAC_MARKER.len();
    loop {
        let header = bytes.get(offset..offset + FLAC_BLOCK_HEADER_LEN)?;
        let size = u32::from_be_bytes([0, header[1], header[2], header[3]]) as usize;
        let end = offset + FLAC_BLOCK_HEADER_LEN + size;
        if end > bytes.len() {
            return None;
        }
        if header[0] & FLAC_LAST_BLOCK != 0 {
            return Some((offset, end));
        }
        offset = end;
    }
}

/// lofty only inserts comment blocks cleanly when the chain ends in PADDING.
/// Otherwise it rewrites the wrong header byte (or panics when STREAMINFO
/// is the only block).
fn ensure_trailing_padding(path: &Path) -> Result<(), TagError> {
    let mut bytes = std::fs::read(path)?;

    // Not a bare FLAC stream; lofty reports the problem
    let Some((header, end)) = last_metadata_block(&bytes) else {
        return Ok(());
    };

    if bytes[header] & !FLAC_LAST_BLOCK == FLAC_BLOCK_PADDING {
        return Ok(());
    }

    debug!(file = %path.display(), "Appending PADDING block to FLAC metadata");
    bytes[header] &= !FLAC_LAST_BLOCK;
    bytes.splice(end..end, [FLAC_LAST_BLOCK | FLAC_BLOCK_PADDING, 0, 0, 0]);
    std::fs::write(path, bytes)?;
    Ok(())
}

fn write_id3(path: &Path, record: &MetadataRecord) -> Result<(), TagError> {
    let mut tag = match id3::Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => {
            debug!(file = %path.display(), "No ID3 tag present, creating one");
            id3::Tag::new()
        }
        Err(e) => return Err(e.into()),
    };

    tag.set_text(id3_frames::TITLE, record.title.as_str());
    tag.set_text(id3_frames::ARTIST, record.artist.as_str());
    tag.set_text(id3_frames::ALBUM, record.album.as_str());
    tag.set_text(id3_frames::RECORDING_TIME, record.year.as_str());

    match legacy_year(&record.year) {
        Ok(year) => tag.set_text(id3_frames::YEAR, year),
        Err(e) => error!(
            file = %path.display(),
            error = %e,
            "Failed to write year metadata"
        ),
    }

    tag.write_to_path(path, Version::Id3v24)?;
    Ok(())
}

/// TYER holds a bare four-digit year
fn legacy_year(year: &str) -> Result<&str, TagError> {
    if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
        Ok(year)
    } else {
        Err(TagError::InvalidLegacyYear(year.to_string()))
    }
}

fn write_vorbis_comments(path: &Path, record: &MetadataRecord) -> Result<(), TagError> {
    let mut tagged_file = lofty::read_from_path(path)?;

    if tagged_file.primary_tag().is_none() {
        let tag_type = tagged_file.primary_tag_type();
        debug!(file = %path.display(), ?tag_type, "No primary tag present, creating one");
        tagged_file.insert_tag(Tag::new(tag_type));
    }

    let tag = tagged_file
        .primary_tag_mut()
        .ok_or_else(|| TagError::NoTagContainer(path.to_path_buf()))?;

    tag.insert_text(ItemKey::TrackTitle, record.title.clone());
    tag.insert_text(ItemKey::TrackArtist, record.artist.clone());
    tag.insert_text(ItemKey::AlbumTitle, record.album.clone());
    tag.insert_text(ItemKey::RecordingDate, record.year.clone());

    tag.save_to_path(path, WriteOptions::default())?;
    Ok(())
}
