//! Reporter - turns a run into pipeline-visible signals.
//!
//! This is the outermost boundary: nothing here panics or returns an error.
//! A step output that cannot be written fails the run.

use std::error::Error as _;

use tracing::warn;

use crate::domain::{Decision, Diagnostics, RunError, UploadResult};
use crate::ports::{PipelineSink, SinkError};

use super::assembler::Assembled;
use super::inputs::{ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY, Environment};

pub const OUTPUT_ARTIFACT_ID: &str = "artifact-id";
pub const OUTPUT_ARTIFACT_URL: &str = "artifact-url";
pub const OUTPUT_ARTIFACT_DIGEST: &str = "artifact-digest";

/// How the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Succeeded)
    }

    /// Process exit code for this status.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Succeeded => 0,
            RunStatus::Failed => 1,
        }
    }
}

pub struct Reporter<'a, S: ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: PipelineSink + ?Sized> Reporter<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self { sink }
    }

    /// Log what is about to be uploaded.
    ///
    /// Credentials are reported by presence and length only.
    pub fn announce(&mut self, assembled: &Assembled, env: &Environment) {
        let request = &assembled.request;
        let storage = &assembled.storage;

        self.sink.info(&format!("Artifact name: {}", request.name));
        self.sink.info(&format!("Paths: {}", request.paths.join(", ")));
        self.sink.info(&format!("S3 bucket: {}", storage.bucket()));
        if let Some(prefix) = storage.prefix() {
            self.sink.info(&format!("S3 prefix: {prefix}"));
        }
        if let Some(endpoint) = storage.endpoint() {
            self.sink.info(&format!("S3 endpoint: {endpoint}"));
        }

        let access_key = env.var(ENV_ACCESS_KEY_ID).unwrap_or_default();
        let secret_key = env.var(ENV_SECRET_ACCESS_KEY).unwrap_or_default();
        self.sink.debug(&format!(
            "{ENV_ACCESS_KEY_ID} present: {}",
            !access_key.is_empty()
        ));
        self.sink.debug(&format!(
            "{ENV_SECRET_ACCESS_KEY} present: {}",
            !secret_key.is_empty()
        ));
        self.sink
            .debug(&format!("{ENV_ACCESS_KEY_ID} length: {}", access_key.len()));
        self.sink
            .debug(&format!("{ENV_SECRET_ACCESS_KEY} length: {}", secret_key.len()));
    }

    pub fn report(&mut self, decision: Decision) -> RunStatus {
        match decision {
            Decision::Publish(result) => match self.publish(&result) {
                Ok(()) => RunStatus::Succeeded,
                Err(e) => {
                    warn!(error = %e, "failed to set step output");
                    self.sink.set_failed(&e.to_string());
                    RunStatus::Failed
                }
            },
            Decision::Warn { message } => {
                self.sink.warning(&message);
                RunStatus::Succeeded
            }
            Decision::Notice { message } => {
                self.sink.info(&message);
                RunStatus::Succeeded
            }
            Decision::Fail(err) => self.report_error(&err),
        }
    }

    /// Mark the run failed and surface whatever diagnostics the error carries.
    pub fn report_error(&mut self, err: &RunError) -> RunStatus {
        self.sink.set_failed(&err.to_string());

        let mut source = err.source();
        while let Some(cause) = source {
            self.sink.debug(&format!("caused by: {cause}"));
            source = cause.source();
        }

        if let Some(diagnostics) = err.diagnostics() {
            self.diagnostics(diagnostics);
        }
        RunStatus::Failed
    }

    fn diagnostics(&mut self, diagnostics: &Diagnostics) {
        if let Some(metadata) = &diagnostics.metadata {
            self.sink.error(&format!("AWS SDK Metadata: {metadata}"));
        }
        if let Some(code) = &diagnostics.code {
            self.sink.error(&format!("Error Code: {code}"));
        }
        if let Some(cause) = &diagnostics.cause {
            self.sink.error(&format!("Cause: {cause}"));
        }
    }

    /// Set the step outputs, stopping at the first one that cannot be written.
    fn publish(&mut self, result: &UploadResult) -> Result<(), SinkError> {
        self.sink.set_output(OUTPUT_ARTIFACT_ID, &result.id)?;
        self.sink.set_output(OUTPUT_ARTIFACT_URL, &result.url)?;
        self.sink.set_output(OUTPUT_ARTIFACT_DIGEST, &result.digest)?;

        self.sink.info("");
        self.sink.info("Artifact upload complete!");
        self.sink.info(&format!("  ID: {}", result.id));
        self.sink.info(&format!("  URL: {}", result.url));
        self.sink.info(&format!("  Digest: {}", result.digest));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigError, UploadError};
    use crate::impls::{RecordingSink, SinkLine};

    fn result() -> UploadResult {
        UploadResult {
            id: "a1".to_string(),
            url: "https://x".to_string(),
            digest: "sha256:deadbeef".to_string(),
        }
    }

    #[test]
    fn publish_sets_outputs_verbatim() {
        let mut sink = RecordingSink::new();
        let status = Reporter::new(&mut sink).report(Decision::Publish(result()));

        assert_eq!(status, RunStatus::Succeeded);
        assert_eq!(sink.output("artifact-id"), Some("a1"));
        assert_eq!(sink.output("artifact-url"), Some("https://x"));
        assert_eq!(sink.output("artifact-digest"), Some("sha256:deadbeef"));
        assert!(sink.failure.is_none());
        assert!(sink.lines.contains(&SinkLine::Info("  Digest: sha256:deadbeef".to_string())));
    }

    #[test]
    fn unwritable_output_fails_the_run() {
        let mut sink = RecordingSink::rejecting_outputs();
        let status = Reporter::new(&mut sink).report(Decision::Publish(result()));

        assert_eq!(status, RunStatus::Failed);
        assert_eq!(sink.failure.as_deref(), Some("io error: output file unavailable"));
        assert!(sink.outputs.is_empty());
        assert!(!sink.lines.iter().any(|l| l.text() == "Artifact upload complete!"));
    }

    #[test]
    fn warn_and_notice_succeed_without_outputs() {
        let mut sink = RecordingSink::new();
        let status = Reporter::new(&mut sink).report(Decision::Warn {
            message: "nothing".to_string(),
        });
        assert!(status.is_success());
        assert_eq!(sink.lines, vec![SinkLine::Warning("nothing".to_string())]);
        assert!(sink.outputs.is_empty());

        let mut sink = RecordingSink::new();
        Reporter::new(&mut sink).report(Decision::Notice {
            message: "nothing".to_string(),
        });
        assert_eq!(sink.lines, vec![SinkLine::Info("nothing".to_string())]);
    }

    #[test]
    fn config_error_fails_without_diagnostics() {
        let mut sink = RecordingSink::new();
        let err = RunError::from(ConfigError::MissingInput {
            name: "s3-bucket".to_string(),
        });
        let status = Reporter::new(&mut sink).report_error(&err);

        assert_eq!(status, RunStatus::Failed);
        assert_eq!(
            sink.failure.as_deref(),
            Some("Input required and not supplied: s3-bucket")
        );
        assert!(sink.errors().is_empty());
    }

    #[test]
    fn only_present_diagnostics_are_emitted() {
        let mut sink = RecordingSink::new();
        let err = RunError::from(
            UploadError::new("Access Denied")
                .with_metadata(serde_json::json!({"httpStatusCode": 403}))
                .with_code("AccessDenied"),
        );
        Reporter::new(&mut sink).report(Decision::Fail(err));

        assert_eq!(sink.failure.as_deref(), Some("Access Denied"));
        assert_eq!(
            sink.errors(),
            vec![
                r#"AWS SDK Metadata: {"httpStatusCode":403}"#,
                "Error Code: AccessDenied",
            ]
        );
    }

    #[test]
    fn cause_diagnostic_is_json() {
        let mut sink = RecordingSink::new();
        let err = RunError::from(
            UploadError::new("socket hang up").with_cause(serde_json::json!({"code": "ECONNRESET"})),
        );
        Reporter::new(&mut sink).report_error(&err);
        assert_eq!(sink.errors(), vec![r#"Cause: {"code":"ECONNRESET"}"#]);
    }

    #[test]
    fn source_chain_goes_to_debug() {
        let mut sink = RecordingSink::new();
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = RunError::from(UploadError::new("upload failed").with_source(io));
        Reporter::new(&mut sink).report_error(&err);
        assert!(sink.lines.contains(&SinkLine::Debug("caused by: timed out".to_string())));
    }

    #[test]
    fn announce_never_prints_credential_values() {
        let env = Environment::new("/work")
            .with_var(ENV_ACCESS_KEY_ID, "AKIAEXAMPLE")
            .with_var(ENV_SECRET_ACCESS_KEY, "s3cr3t");
        let assembled = Assembled {
            storage: crate::domain::StorageConfig::new(
                "builds",
                Some("ci/".to_string()),
                None,
                "us-east-1",
                false,
            ),
            context: crate::domain::RunContext::default(),
            request: crate::domain::UploadRequest {
                name: "artifact".to_string(),
                paths: vec!["a".to_string(), "b".to_string()],
                root_directory: "/work".into(),
                retention_days: None,
                compression_level: Default::default(),
                overwrite: false,
                include_hidden_files: false,
            },
        };

        let mut sink = RecordingSink::new();
        Reporter::new(&mut sink).announce(&assembled, &env);

        assert!(sink.lines.contains(&SinkLine::Info("Paths: a, b".to_string())));
        assert!(sink.lines.contains(&SinkLine::Info("S3 prefix: ci/".to_string())));
        assert!(sink.lines.contains(&SinkLine::Debug("AWS_ACCESS_KEY_ID length: 11".to_string())));
        assert!(sink.lines.contains(&SinkLine::Debug("AWS_SECRET_ACCESS_KEY present: true".to_string())));
        assert!(!sink.lines.iter().any(|l| l.text().contains("s3cr3t")));
        assert!(!sink.lines.iter().any(|l| l.text().starts_with("S3 endpoint")));
    }
}
