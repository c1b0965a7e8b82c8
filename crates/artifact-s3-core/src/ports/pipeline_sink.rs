//! PipelineSink port - what the pipeline runner sees
//!
//! Logs, step outputs and the failure state all go through this trait.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected input: name and value must not contain the delimiter {0}")]
    DelimiterCollision(String),
}

/// PipelineSink receives everything the run reports.
///
/// Log methods are infallible from the caller's point of view; a sink that
/// cannot write drops the line. `set_output` reports failures so the caller
/// can fail the run.
pub trait PipelineSink {
    fn info(&mut self, message: &str);

    /// Only shown when the pipeline runs with step debugging enabled.
    fn debug(&mut self, message: &str);

    fn warning(&mut self, message: &str);

    fn error(&mut self, message: &str);

    fn set_output(&mut self, name: &str, value: &str) -> Result<(), SinkError>;

    /// Report `message` as an error and mark the step as failed.
    fn set_failed(&mut self, message: &str);
}
