//! Upload request: what to upload and how.

use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Artifact name used when `name` is not supplied.
pub const DEFAULT_ARTIFACT_NAME: &str = "artifact";

/// Compression level used when `compression-level` is not supplied.
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;

/// Split a multi-line path specification into path entries.
///
/// Lines are trimmed (which also drops the `\r` of CRLF endings) and blank
/// lines are discarded. Order is preserved and duplicates are kept.
pub fn parse_paths(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Compression level as read from the `compression-level` input.
///
/// A value that is not a number is not rejected: it is forwarded as
/// `NotANumber` (serialized as `null`) and left to the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    Level(i64),
    NotANumber,
}

impl CompressionLevel {
    pub fn level(&self) -> Option<i64> {
        match self {
            CompressionLevel::Level(n) => Some(*n),
            CompressionLevel::NotANumber => None,
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(DEFAULT_COMPRESSION_LEVEL)
    }
}

impl From<Option<i64>> for CompressionLevel {
    fn from(parsed: Option<i64>) -> Self {
        parsed.map_or(CompressionLevel::NotANumber, CompressionLevel::Level)
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionLevel::Level(n) => write!(f, "{n}"),
            CompressionLevel::NotANumber => f.write_str("NaN"),
        }
    }
}

impl Serialize for CompressionLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CompressionLevel::Level(n) => serializer.serialize_i64(*n),
            CompressionLevel::NotANumber => serializer.serialize_none(),
        }
    }
}

/// The request passed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub name: String,

    /// Path entries in the order they were given. Never contains empty strings.
    pub paths: Vec<String>,

    /// Absolute directory the paths are relative to.
    pub root_directory: PathBuf,

    /// `None` lets the uploader apply its default retention.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,

    pub compression_level: CompressionLevel,
    pub overwrite: bool,
    pub include_hidden_files: bool,
}
