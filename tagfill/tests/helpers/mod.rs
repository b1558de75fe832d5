//! Test Helper Utilities
//!
//! Shared utilities for testing tagfill

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

// Re-export commonly used items
pub use fakes::{FakeFingerprinter, FakeIdentification, FakeRegistry};
pub use fixtures::{
    minimal_flac, minimal_ogg, mp3_with_frames, read_id3_frame, stream_info_only_flac, FLAC_FRAME,
};
