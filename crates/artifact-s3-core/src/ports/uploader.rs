//! ArtifactUploader port - the external uploading collaborator
//!
//! Globbing, hashing, compression, multipart transfer and network retries
//! all live behind this trait.

use async_trait::async_trait;

use crate::domain::{RunContext, StorageConfig, UploadError, UploadRequest, UploadResult};

/// ArtifactUploader stores one artifact.
///
/// # Contract
/// - Called exactly once per run; callers never retry.
/// - No timeout is imposed by the caller.
/// - Failures meaning "the paths matched no files" should be tagged
///   [`ErrorKind::NoFilesFound`](crate::domain::ErrorKind::NoFilesFound).
///
/// # Example
/// ```ignore
/// struct MyUploader;
///
/// #[async_trait]
/// impl ArtifactUploader for MyUploader {
///     async fn upload(&self, config: &StorageConfig, context: &RunContext, request: &UploadRequest)
///         -> Result<UploadResult, UploadError> { ... }
/// }
/// ```
#[async_trait]
pub trait ArtifactUploader: Send + Sync {
    async fn upload(
        &self,
        config: &StorageConfig,
        context: &RunContext,
        request: &UploadRequest,
    ) -> Result<UploadResult, UploadError>;
}

