//! Core data types
//!
//! A [`MetadataRecord`] never holds a null field: an unresolved value is the
//! field's placeholder string ("Unknown Title", ...).

use std::fmt;
use std::path::{Path, PathBuf};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_YEAR: &str = "Unknown Year";

/// All four placeholder strings, in field order
pub const PLACEHOLDERS: [&str; 4] = [UNKNOWN_TITLE, UNKNOWN_ARTIST, UNKNOWN_ALBUM, UNKNOWN_YEAR];

/// The four logical metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Artist,
    Album,
    Year,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Artist, Field::Album, Field::Year];

    /// Placeholder string used when this field is unresolved
    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Title => UNKNOWN_TITLE,
            Field::Artist => UNKNOWN_ARTIST,
            Field::Album => UNKNOWN_ALBUM,
            Field::Year => UNKNOWN_YEAR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Album => "album",
            Field::Year => "year",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Title, artist, album and year of one audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
}

impl MetadataRecord {
    /// Record with every field set to its placeholder
    pub fn placeholders() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            year: UNKNOWN_YEAR.to_string(),
        }
    }

    /// Build a record from optional tag values
    ///
    /// Absent or blank values become the field's placeholder.
    pub fn from_parts(
        title: Option<String>,
        artist: Option<String>,
        album: Option<String>,
        year: Option<String>,
    ) -> Self {
        Self {
            title: or_placeholder(title, Field::Title),
            artist: or_placeholder(artist, Field::Artist),
            album: or_placeholder(album, Field::Album),
            year: or_placeholder(year, Field::Year),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Artist => &self.artist,
            Field::Album => &self.album,
            Field::Year => &self.year,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Artist => self.artist = value,
            Field::Album => self.album = value,
            Field::Year => self.year = value,
        }
    }
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self::placeholders()
    }
}

impl fmt::Display for MetadataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title='{}', Artist='{}', Album='{}', Year='{}'",
            self.title, self.artist, self.album, self.year
        )
    }
}

fn or_placeholder(value: Option<String>, field: Field) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => field.placeholder().to_string(),
    }
}

/// Supported tag container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// MPEG audio with ID3v2 tags
    Mp3,
    /// FLAC with Vorbis comments
    Flac,
    /// Ogg Vorbis with Vorbis comments
    OggVorbis,
}

impl AudioFormat {
    /// Detect format from file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            "ogg" => Some(AudioFormat::OggVorbis),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "MP3",
            AudioFormat::Flac => "FLAC",
            AudioFormat::OggVorbis => "OGG Vorbis",
        }
    }
}

/// An audio file queued for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    path: PathBuf,
    format: AudioFormat,
}

impl AudioFile {
    /// Returns `None` when the extension is not a supported format
    pub fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = AudioFormat::from_path(&path)?;
        Some(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }
}

/// Chromaprint output for one file
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintResult {
    /// Track duration in seconds
    pub duration: f64,
    /// Compressed, base64-encoded fingerprint
    pub fingerprint: String,
}

/// First-match recording returned by the identification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingCandidate {
    /// MusicBrainz recording MBID, the join key into the registry
    pub recording_id: Option<String>,
    pub title: String,
    pub artist: String,
}

/// Album and year resolved from the registry's first release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub album: String,
    pub year: String,
}

impl ReleaseInfo {
    pub fn placeholders() -> Self {
        Self {
            album: UNKNOWN_ALBUM.to_string(),
            year: UNKNOWN_YEAR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_fills_placeholders() {
        let record = MetadataRecord::from_parts(None, Some("Daft Punk".into()), Some("  ".into()), None);
        assert_eq!(
            record,
            MetadataRecord {
                title: UNKNOWN_TITLE.into(),
                artist: "Daft Punk".into(),
                album: UNKNOWN_ALBUM.into(),
                year: UNKNOWN_YEAR.into(),
            }
        );
    }

    #[test]
    fn test_get_set_by_field() {
        let mut record = MetadataRecord::placeholders();
        for field in Field::ALL {
            assert_eq!(record.get(field), field.placeholder());
        }
        record.set(Field::Year, "2001");
        assert_eq!(record.year, "2001");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(AudioFormat::from_path(Path::new("a/b.mp3")), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_path(Path::new("b.FLAC")), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::from_path(Path::new("c.Ogg")), Some(AudioFormat::OggVorbis));
        assert_eq!(AudioFormat::from_path(Path::new("d.wav")), None);
        assert_eq!(AudioFormat::from_path(Path::new("noext")), None);
        assert!(AudioFile::new("song.opus").is_none());
    }

    #[test]
    fn test_display() {
        let record = MetadataRecord::placeholders();
        assert_eq!(
            record.to_string(),
            "Title='Unknown Title', Artist='Unknown Artist', Album='Unknown Album', Year='Unknown Year'"
        );
    }
}
