//! Errors - error types and their classification.
//!
//! # Taxonomy
//! - [`ConfigError`]: a required input is missing (fatal, raised before any upload)
//! - [`UploadError`]: anything the uploader reported, tagged with an [`ErrorKind`]
//! - [`RunError`]: what a failed run is reported as

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ErrorKind tags an uploader failure.
///
/// Uploaders that know a failure means "nothing matched the paths" report
/// `NoFilesFound`; everything else is `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoFilesFound,

    #[default]
    #[serde(other)]
    Other,
}

/// Structured diagnostics attached to an uploader failure.
///
/// Each field is optional and reported on its own line when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Storage-provider response metadata (request ids, HTTP status, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// Provider error code, e.g. `AccessDenied`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Underlying cause as reported by the uploader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<serde_json::Value>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none() && self.code.is_none() && self.cause.is_none()
    }
}

/// UploadError is a failure returned by an [`ArtifactUploader`](crate::ports::ArtifactUploader).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct UploadError {
    kind: ErrorKind,
    message: String,
    diagnostics: Diagnostics,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl UploadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Other,
            message: message.into(),
            diagnostics: Diagnostics::default(),
            source: None,
        }
    }

    pub fn no_files_found(message: impl Into<String>) -> Self {
        Self::new(message).with_kind(ErrorKind::NoFilesFound)
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.diagnostics.code = Some(code.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.diagnostics.metadata = Some(metadata);
        self
    }

    pub fn with_cause(mut self, cause: serde_json::Value) -> Self {
        self.diagnostics.cause = Some(cause);
        self
    }

    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

/// ConfigError is raised while resolving inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Input required and not supplied: {name}")]
    MissingInput { name: String },
}

/// RunError is the reason a run is marked as failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No files were found with the provided path: {path}. No artifacts will be uploaded.")]
    NoFilesFound { path: String },

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl RunError {
    /// Diagnostics carried by the underlying uploader failure, if any.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            RunError::Upload(err) => Some(err.diagnostics()),
            RunError::Config(_) | RunError::NoFilesFound { .. } => None,
        }
    }
}
