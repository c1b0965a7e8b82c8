//! Storage target and pipeline run context.
//!
//! Both are built once per run and handed to the uploader as-is.

use serde::{Deserialize, Serialize};

/// Region used when `s3-region` is not supplied.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Where the artifact is stored.
///
/// # Invariant
/// `force_path_style` is `true` whenever `endpoint` is set: custom endpoints
/// (MinIO, R2, Ceph, ...) only work with path-style addressing. The only
/// constructor enforces this, so fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    region: String,
    force_path_style: bool,
}

impl StorageConfig {
    pub fn new(
        bucket: impl Into<String>,
        prefix: Option<String>,
        endpoint: Option<String>,
        region: impl Into<String>,
        force_path_style: bool,
    ) -> Self {
        let force_path_style = force_path_style || endpoint.is_some();
        Self {
            bucket: bucket.into(),
            prefix,
            endpoint,
            region: region.into(),
            force_path_style,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn force_path_style(&self) -> bool {
        self.force_path_style
    }
}

/// Identity of the pipeline run that produced the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunContext {
    /// `owner/name` of the repository.
    pub repository: String,
    pub run_id: i64,
    pub run_attempt: i64,
}

impl RunContext {
    pub const UNKNOWN_REPOSITORY: &'static str = "unknown/unknown";
    pub const DEFAULT_RUN_ID: i64 = 0;
    pub const DEFAULT_RUN_ATTEMPT: i64 = 1;
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            repository: Self::UNKNOWN_REPOSITORY.to_string(),
            run_id: Self::DEFAULT_RUN_ID,
            run_attempt: Self::DEFAULT_RUN_ATTEMPT,
        }
    }
}
