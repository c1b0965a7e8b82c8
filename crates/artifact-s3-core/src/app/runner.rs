//! run - the whole step, end to end.
//!
//! Resolve → Assemble → Build → Invoke → Classify → Report, once.

use tracing::{info, instrument};

use crate::domain::{Decider, PolicyDecider, RunError, UploadOutcome};
use crate::ports::{ArtifactUploader, PipelineSink};

use super::assembler::assemble;
use super::inputs::{Environment, RawInputs};
use super::orchestrator::UploadOrchestrator;
use super::reporter::{Reporter, RunStatus};

/// Run the upload step against `env`.
///
/// Missing required inputs fail the run before the uploader is touched.
/// The returned status is all the caller needs to pick an exit code; every
/// message has already gone to `sink`.
#[instrument(name = "run", skip_all)]
pub async fn run<U, S>(env: &Environment, uploader: &U, sink: &mut S) -> RunStatus
where
    U: ArtifactUploader + ?Sized,
    S: PipelineSink + ?Sized,
{
    let mut reporter = Reporter::new(sink);

    let inputs = match RawInputs::resolve(env) {
        Ok(inputs) => inputs,
        Err(e) => return reporter.report_error(&RunError::Config(e)),
    };

    let assembled = assemble(&inputs, env);
    reporter.announce(&assembled, env);

    let result = UploadOrchestrator::new(uploader).invoke(&assembled).await;
    let outcome = UploadOutcome::classify(result);
    info!(outcome = ?outcome.kind(), policy = %inputs.if_no_files_found, "upload finished");

    let decision = PolicyDecider::new(inputs.if_no_files_found, inputs.path).decide(outcome);
    reporter.report(decision)
}
