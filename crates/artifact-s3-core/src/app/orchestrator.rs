//! UploadOrchestrator - the single call to the uploader.

use tracing::{debug, instrument};

use crate::domain::{UploadError, UploadResult};
use crate::ports::ArtifactUploader;

use super::assembler::Assembled;

/// Invokes the uploader once and hands back whatever it returns.
///
/// # Design
/// - one call per run, no retry, no timeout
/// - errors are passed through untouched; classification happens afterwards
pub struct UploadOrchestrator<'a, U: ?Sized> {
    uploader: &'a U,
}

impl<'a, U: ArtifactUploader + ?Sized> UploadOrchestrator<'a, U> {
    pub fn new(uploader: &'a U) -> Self {
        Self { uploader }
    }

    #[instrument(
        name = "upload",
        skip_all,
        fields(
            artifact = %assembled.request.name,
            bucket = %assembled.storage.bucket(),
            paths = assembled.request.paths.len(),
        )
    )]
    pub async fn invoke(&self, assembled: &Assembled) -> Result<UploadResult, UploadError> {
        debug!(root = %assembled.request.root_directory.display(), "invoking uploader");
        let result = self
            .uploader
            .upload(&assembled.storage, &assembled.context, &assembled.request)
            .await;
        match &result {
            Ok(r) => debug!(id = %r.id, "uploader finished"),
            Err(e) => debug!(kind = ?e.kind(), error = %e, "uploader failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::assembler::assemble;
    use crate::app::inputs::{Environment, RawInputs};
    use crate::impls::ScriptedUploader;

    fn assembled() -> Assembled {
        let env = Environment::new("/work")
            .with_input("path", "dist/")
            .with_input("s3-bucket", "builds");
        assemble(&RawInputs::resolve(&env).unwrap(), &env)
    }

    #[tokio::test]
    async fn invokes_uploader_exactly_once_with_assembled_values() {
        let uploader = ScriptedUploader::succeeding("a1", "https://x", "sha256:deadbeef");
        let assembled = assembled();

        let result = UploadOrchestrator::new(&uploader).invoke(&assembled).await.unwrap();

        assert_eq!(result.id, "a1");
        assert_eq!(uploader.calls(), 1);
        let seen = uploader.last_request().expect("request recorded");
        assert_eq!(seen, assembled.request);
    }

    #[tokio::test]
    async fn passes_errors_through_untouched() {
        let uploader = ScriptedUploader::failing(UploadError::new("Access Denied").with_code("AccessDenied"));

        let err = UploadOrchestrator::new(&uploader)
            .invoke(&assembled())
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Access Denied");
        assert_eq!(err.diagnostics().code.as_deref(), Some("AccessDenied"));
    }
}
