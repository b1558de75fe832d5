//! Per-file resolution workflow
//!
//! Each file moves through READ → (COMPLETE | NEEDS_LOOKUP) → IDENTIFY →
//! MERGE → WRITE before the next file starts. Lookup failures fall back to
//! the tags already in the file; nothing short of a configuration error
//! stops the batch.

pub mod pipeline;
pub mod policy;
pub mod statistics;

pub use pipeline::{FileOutcome, Pipeline, PipelineConfig, Resolution};
pub use policy::{is_missing, merge, missing_fields, PlaceholderMatch};
pub use statistics::BatchSummary;
