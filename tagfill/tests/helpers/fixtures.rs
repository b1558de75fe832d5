//! Synthetic audio fixtures
//!
//! Files carry just enough structure for the tag libraries; they are not
//! decodable audio.

use id3::TagLike;
use std::path::{Path, PathBuf};

/// STREAMINFO body: 44.1 kHz, stereo, 16 bit, no total sample count
const STREAM_INFO: [u8; 34] = [
    0x10, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A, 0xC4, 0x42, 0xF0, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// Bytes standing in for the first FLAC audio frame
pub const FLAC_FRAME: [u8; 8] = [0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x5A, 0x1C];

/// MP3 body (one MPEG-1 Layer III frame header plus padding) with an ID3v2.4
/// tag holding `frames`. No tag is written when `frames` is empty.
pub fn mp3_with_frames(dir: &Path, name: &str, frames: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let mut body = vec![0xFF, 0xFB, 0x90, 0x64];
    body.resize(417, 0);
    std::fs::write(&path, body).unwrap();

    if !frames.is_empty() {
        let mut tag = id3::Tag::new();
        for (id, value) in frames {
            tag.set_text(*id, *value);
        }
        tag.write_to_path(&path, id3::Version::Id3v24).unwrap();
    }
    path
}

fn write_flac(path: PathBuf, blocks: &[(u8, &[u8])]) -> PathBuf {
    let mut bytes = b"fLaC".to_vec();
    for (i, (block_type, content)) in blocks.iter().enumerate() {
        let last = if i + 1 == blocks.len() { 0x80 } else { 0x00 };
        bytes.push(last | block_type);
        bytes.extend_from_slice(&(content.len() as u32).to_be_bytes()[1..]);
        bytes.extend_from_slice(content);
    }
    bytes.extend_from_slice(&FLAC_FRAME);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// STREAMINFO, a trailing PADDING block, then [`FLAC_FRAME`]
pub fn minimal_flac(dir: &Path, name: &str) -> PathBuf {
    write_flac(dir.join(name), &[(0, &STREAM_INFO[..]), (1, &[0u8; 16][..])])
}

/// STREAMINFO flagged as the last metadata block, then [`FLAC_FRAME`]
pub fn stream_info_only_flac(dir: &Path, name: &str) -> PathBuf {
    write_flac(dir.join(name), &[(0, &STREAM_INFO[..])])
}

/// Copy of `tests/fixtures/minimal.ogg`: Vorbis identification, empty
/// comment and setup headers, then one page of silent audio packets
pub fn minimal_ogg(dir: &Path, name: &str) -> PathBuf {
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/minimal.ogg");
    let path = dir.join(name);
    std::fs::copy(source, &path).unwrap();
    path
}

/// Raw text of an ID3 frame, if present
pub fn read_id3_frame(path: &Path, frame_id: &str) -> Option<String> {
    let tag = id3::Tag::read_from_path(path).ok()?;
    let frame = tag.get(frame_id)?;
    frame.content().text().map(str::to_string)
}
