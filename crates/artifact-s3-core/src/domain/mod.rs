//! Domain model (storage target, run context, request, outcome, decision, errors).

pub mod config;
pub mod decision;
pub mod errors;
pub mod outcome;
pub mod request;

pub use config::{DEFAULT_REGION, RunContext, StorageConfig};
pub use decision::{Decider, Decision, NoFilesFoundPolicy, PolicyDecider};
pub use errors::{ConfigError, Diagnostics, ErrorKind, RunError, UploadError};
pub use outcome::{NO_FILES_FOUND_MARKER, OutcomeKind, UploadOutcome, UploadResult, is_no_files_found};
pub use request::{
    CompressionLevel, DEFAULT_ARTIFACT_NAME, DEFAULT_COMPRESSION_LEVEL, UploadRequest, parse_paths,
};
