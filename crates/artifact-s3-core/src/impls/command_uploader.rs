//! CommandUploader - ArtifactUploader backed by an external uploader process
//!
//! # Protocol
//! 1. spawn the uploader in the artifact's root directory
//! 2. write one JSON document `{"config", "context", "request"}` to its stdin
//! 3. read one JSON document from its stdout:
//!    `{"result": {"id", "url", "digest"}}` or
//!    `{"error": {"message", "kind"?, "code"?, "metadata"?, "cause"?}}`
//!
//! The uploader's stderr is inherited so its own logs reach the pipeline.

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::app::inputs::{Environment, InputResolver};
use crate::domain::{
    Diagnostics, ErrorKind, RunContext, StorageConfig, UploadError, UploadRequest, UploadResult,
};
use crate::ports::ArtifactUploader;

/// Environment variable naming the uploader command.
pub const ENV_UPLOADER: &str = "ARTIFACT_S3_UPLOADER";

/// Uploader command used when [`ENV_UPLOADER`] is unset.
pub const DEFAULT_UPLOADER: &str = "artifact-s3-uploader";

#[derive(Serialize)]
struct Invocation<'a> {
    config: &'a StorageConfig,
    context: &'a RunContext,
    request: &'a UploadRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Response {
    Result(UploadResult),
    Error(ErrorDocument),
}

#[derive(Debug, Deserialize)]
struct ErrorDocument {
    message: String,
    #[serde(default)]
    kind: ErrorKind,
    #[serde(flatten)]
    diagnostics: Diagnostics,
}

impl From<ErrorDocument> for UploadError {
    fn from(doc: ErrorDocument) -> Self {
        UploadError::new(doc.message)
            .with_kind(doc.kind)
            .with_diagnostics(doc.diagnostics)
    }
}

/// Runs `program args..` once per upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandUploader {
    program: String,
    args: Vec<String>,
}

impl CommandUploader {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Read the command line from [`ENV_UPLOADER`], split on whitespace.
    pub fn from_env(env: &Environment) -> Self {
        let command_line = InputResolver::new(env).env_or(ENV_UPLOADER, DEFAULT_UPLOADER);
        Self::parse(command_line).unwrap_or_else(|| Self::new(DEFAULT_UPLOADER, Vec::new()))
    }

    /// `None` for a blank command line.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_owned);
        let program = words.next()?;
        Some(Self::new(program, words.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn spawn_error(&self, e: std::io::Error) -> UploadError {
        UploadError::new(format!("failed to start artifact uploader `{}`: {e}", self.program))
            .with_source(e)
    }
}

/// Decode what the uploader printed.
fn decode_response(stdout: &[u8], status: std::process::ExitStatus) -> Result<UploadResult, UploadError> {
    match serde_json::from_slice::<Response>(stdout) {
        Ok(Response::Result(result)) if status.success() => Ok(result),
        Ok(Response::Result(_)) => Err(UploadError::new(format!(
            "artifact uploader reported a result but exited with {status}"
        ))),
        Ok(Response::Error(doc)) => Err(doc.into()),
        Err(e) if status.success() => Err(UploadError::new(format!(
            "artifact uploader produced an unreadable response: {e}"
        ))
        .with_source(e)),
        Err(_) => Err(UploadError::new(format!("artifact uploader exited with {status}"))),
    }
}

#[async_trait]
impl ArtifactUploader for CommandUploader {
    async fn upload(
        &self,
        config: &StorageConfig,
        context: &RunContext,
        request: &UploadRequest,
    ) -> Result<UploadResult, UploadError> {
        let payload = serde_json::to_vec(&Invocation {
            config,
            context,
            request,
        })
        .map_err(|e| UploadError::new(format!("failed to encode upload request: {e}")).with_source(e))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&request.root_directory)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;
        debug!(program = %self.program, pid = ?child.id(), "spawned artifact uploader");

        // stdout is drained while the request is written, so neither pipe can fill up
        let stdin = child.stdin.take();
        let write_request = async move {
            if let Some(mut stdin) = stdin {
                if let Err(e) = stdin.write_all(&payload).await {
                    // the uploader may exit before reading everything; its response decides
                    warn!(error = %e, "failed to write upload request to uploader stdin");
                }
                // dropping stdin closes the pipe
            }
        };
        let ((), output) = tokio::join!(write_request, child.wait_with_output());
        let output = output.map_err(|e| {
            UploadError::new(format!("failed to wait for artifact uploader: {e}")).with_source(e)
        })?;
        debug!(status = %output.status, bytes = output.stdout.len(), "artifact uploader exited");

        decode_response(&output.stdout, output.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[cfg(unix)]
    fn status(code: i32) -> std::process::ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[rstest]
    #[case::default("", None)]
    #[case::program("uploader", Some(("uploader", vec![])))]
    #[case::with_args("node dist/upload.js --quiet", Some(("node", vec!["dist/upload.js", "--quiet"])))]
    fn parse_command_line(#[case] raw: &str, #[case] expected: Option<(&str, Vec<&str>)>) {
        let parsed = CommandUploader::parse(raw);
        let expected = expected.map(|(p, a)| {
            CommandUploader::new(p, a.into_iter().map(str::to_owned).collect())
        });
        assert_eq!(parsed, expected);
    }

    #[test]
    fn from_env_defaults_program() {
        let uploader = CommandUploader::from_env(&Environment::new("/"));
        assert_eq!(uploader.program(), DEFAULT_UPLOADER);
    }

    #[cfg(unix)]
    #[test]
    fn decodes_result_document() {
        let out = br#"{"result":{"id":42,"url":"https://x","digest":"sha256:deadbeef"}}"#;
        let result = decode_response(out, status(0)).unwrap();
        assert_eq!(result.id, "42");
        assert_eq!(result.digest, "sha256:deadbeef");
    }

    #[cfg(unix)]
    #[test]
    fn decodes_error_document_with_diagnostics() {
        let out = br#"{"error":{"message":"Access Denied","code":"AccessDenied","metadata":{"httpStatusCode":403}}}"#;
        let err = decode_response(out, status(1)).unwrap_err();
        assert_eq!(err.message(), "Access Denied");
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.diagnostics().code.as_deref(), Some("AccessDenied"));
        assert_eq!(
            err.diagnostics().metadata,
            Some(serde_json::json!({"httpStatusCode": 403}))
        );
        assert!(err.diagnostics().cause.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn decodes_tagged_no_files_error() {
        let out = br#"{"error":{"message":"nothing matched","kind":"no_files_found"}}"#;
        let err = decode_response(out, status(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoFilesFound);
    }

    #[cfg(unix)]
    #[test]
    fn garbage_with_failing_status_is_generic() {
        let err = decode_response(b"segfault", status(139)).unwrap_err();
        assert!(err.message().starts_with("artifact uploader exited with"));
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[cfg(unix)]
    #[test]
    fn garbage_with_success_status_keeps_parse_error() {
        use std::error::Error as _;
        let err = decode_response(b"{", status(0)).unwrap_err();
        assert!(err.message().contains("unreadable response"));
        assert!(err.source().is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_external_process() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("uploader.sh");
        std::fs::write(
            &script,
            "cat > request.json\necho '{\"result\":{\"id\":\"a1\",\"url\":\"https://x\",\"digest\":\"sha256:deadbeef\"}}'\n",
        )
        .unwrap();

        let uploader = CommandUploader::new("sh", vec![script.display().to_string()]);
        let request = UploadRequest {
            name: "artifact".to_string(),
            paths: vec!["dist/".to_string()],
            root_directory: dir.path().to_path_buf(),
            retention_days: Some(7),
            compression_level: Default::default(),
            overwrite: false,
            include_hidden_files: false,
        };
        let config = StorageConfig::new("builds", None, None, "us-east-1", false);

        let result = uploader
            .upload(&config, &RunContext::default(), &request)
            .await
            .unwrap();
        assert_eq!(result.url, "https://x");

        let sent: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join("request.json")).unwrap()).unwrap();
        assert_eq!(sent["config"]["bucket"], "builds");
        assert_eq!(sent["context"]["repository"], "unknown/unknown");
        assert_eq!(sent["request"]["retentionDays"], 7);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn chatty_uploader_with_large_request_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("uploader.sh");
        // fills the stdout pipe before reading any of the request
        std::fs::write(
            &script,
            "head -c 262144 /dev/zero | tr '\\0' ' '\ncat > /dev/null\necho '{\"result\":{\"id\":\"a1\",\"url\":\"https://x\",\"digest\":\"sha256:deadbeef\"}}'\n",
        )
        .unwrap();

        let uploader = CommandUploader::new("sh", vec![script.display().to_string()]);
        let request = UploadRequest {
            name: "artifact".to_string(),
            paths: (0..20_000).map(|i| format!("build/output/chunk-{i:05}.bin")).collect(),
            root_directory: dir.path().to_path_buf(),
            retention_days: None,
            compression_level: Default::default(),
            overwrite: false,
            include_hidden_files: false,
        };
        let config = StorageConfig::new("builds", None, None, "us-east-1", false);

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            uploader.upload(&config, &RunContext::default(), &request),
        )
        .await
        .expect("uploader exchange deadlocked")
        .unwrap();
        assert_eq!(result.id, "a1");
    }

    #[tokio::test]
    async fn missing_program_is_generic_failure() {
        let uploader = CommandUploader::new("definitely-not-an-uploader-binary", Vec::new());
        let request = UploadRequest {
            name: "artifact".to_string(),
            paths: vec!["dist/".to_string()],
            root_directory: std::env::temp_dir(),
            retention_days: None,
            compression_level: Default::default(),
            overwrite: false,
            include_hidden_files: false,
        };
        let config = StorageConfig::new("builds", None, None, "us-east-1", false);

        let err = uploader
            .upload(&config, &RunContext::default(), &request)
            .await
            .unwrap_err();
        assert!(err.message().contains("failed to start artifact uploader"));
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
