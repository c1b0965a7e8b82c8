//! Outcome model: classification of a single upload attempt.
//!
//! This module only defines the "shape" of results. What a run does with an
//! outcome is decided in [`decision`](super::decision).

use serde::{Deserialize, Deserializer, Serialize};

use super::errors::{ErrorKind, UploadError};

/// Substring that marks an untagged uploader failure as "no files found".
///
/// # Known fragility
/// Matching is a plain, case-sensitive `contains` on the error message. Any
/// failure whose message happens to include this phrase is classified as
/// [`UploadOutcome::NoFilesFound`]. Uploaders should tag the error with
/// [`ErrorKind::NoFilesFound`] instead; the marker is only consulted for
/// uploaders that do not.
pub const NO_FILES_FOUND_MARKER: &str = "No files found";

/// Identifiers the uploader assigned to a stored artifact.
///
/// Values are opaque and published verbatim. Numeric ids are accepted and
/// kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(deserialize_with = "opaque_string")]
    pub id: String,
    pub url: String,
    pub digest: String,
}

fn opaque_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Opaque {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Opaque::deserialize(deserializer)? {
        Opaque::Text(s) => s,
        Opaque::Number(n) => n.to_string(),
    })
}

/// The closed set of outcome kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    NoFilesFound,
    GenericFailure,
}

/// The classified result of the upload call.
#[derive(Debug)]
pub enum UploadOutcome {
    Success(UploadResult),
    NoFilesFound,
    GenericFailure(UploadError),
}

impl UploadOutcome {
    pub fn classify(result: Result<UploadResult, UploadError>) -> Self {
        match result {
            Ok(result) => UploadOutcome::Success(result),
            Err(err) if is_no_files_found(&err) => UploadOutcome::NoFilesFound,
            Err(err) => UploadOutcome::GenericFailure(err),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            UploadOutcome::Success(_) => OutcomeKind::Success,
            UploadOutcome::NoFilesFound => OutcomeKind::NoFilesFound,
            UploadOutcome::GenericFailure(_) => OutcomeKind::GenericFailure,
        }
    }
}

/// Typed tag first, then the [`NO_FILES_FOUND_MARKER`] substring.
pub fn is_no_files_found(err: &UploadError) -> bool {
    err.kind() == ErrorKind::NoFilesFound || err.message().contains(NO_FILES_FOUND_MARKER)
}
