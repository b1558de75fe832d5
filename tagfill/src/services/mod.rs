//! Services for tag enrichment
//!
//! Leaves of the per-file pipeline: tag I/O, fingerprinting, the two web
//! service clients and the directory scanner.

pub mod acoustid_client;
pub mod file_scanner;
pub mod fingerprinter;
pub mod identifier;
pub mod metadata_resolver;
pub mod musicbrainz_client;
pub mod tag_reader;
pub mod tag_writer;

pub use acoustid_client::{AcoustIDClient, AcoustIDError, IdentificationService};
pub use file_scanner::{FileScanner, ScanError};
pub use fingerprinter::{FingerprintError, FingerprintSource, Fingerprinter};
pub use identifier::FingerprintIdentifier;
pub use metadata_resolver::MetadataResolver;
pub use musicbrainz_client::{MBError, MusicBrainzClient, RecordingRegistry};
pub use tag_reader::TagReader;
pub use tag_writer::{TagWriter, WriteMode};
