//! ScriptedUploader - ArtifactUploader that returns a canned answer（テスト用）

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::{RunContext, StorageConfig, UploadError, UploadRequest, UploadResult};
use crate::ports::ArtifactUploader;

/// Answers the first call with a preset result and records what it was given.
///
/// A second call fails: the step never uploads twice, so seeing one is a bug
/// in the caller.
pub struct ScriptedUploader {
    answer: Mutex<Option<Result<UploadResult, UploadError>>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<UploadRequest>>,
}

impl ScriptedUploader {
    pub fn new(answer: Result<UploadResult, UploadError>) -> Self {
        Self {
            answer: Mutex::new(Some(answer)),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn succeeding(id: &str, url: &str, digest: &str) -> Self {
        Self::new(Ok(UploadResult {
            id: id.to_string(),
            url: url.to_string(),
            digest: digest.to_string(),
        }))
    }

    pub fn failing(error: UploadError) -> Self {
        Self::new(Err(error))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<UploadRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ArtifactUploader for ScriptedUploader {
    async fn upload(
        &self,
        _config: &StorageConfig,
        _context: &RunContext,
        request: &UploadRequest,
    ) -> Result<UploadResult, UploadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());

        self.answer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| Err(UploadError::new("scripted uploader called more than once")))
    }
}
