//! RecordingSink - in-memory PipelineSink（テスト用）

use crate::ports::{PipelineSink, SinkError};

/// One logged line, by level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkLine {
    Info(String),
    Debug(String),
    Warning(String),
    Error(String),
}

impl SinkLine {
    pub fn text(&self) -> &str {
        match self {
            SinkLine::Info(s) | SinkLine::Debug(s) | SinkLine::Warning(s) | SinkLine::Error(s) => s,
        }
    }
}

/// Records everything instead of printing it.
///
/// `set_failed` only fills `failure`; it does not add an `Error` line, so
/// `errors()` lists diagnostics alone.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub lines: Vec<SinkLine>,
    /// Outputs in the order they were set.
    pub outputs: Vec<(String, String)>,
    pub failure: Option<String>,
    /// When set, every `set_output` fails with an io error.
    pub reject_outputs: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose output file cannot be written.
    pub fn rejecting_outputs() -> Self {
        Self {
            reject_outputs: true,
            ..Self::default()
        }
    }

    /// Last value set for output `name`.
    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn errors(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                SinkLine::Error(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                SinkLine::Warning(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PipelineSink for RecordingSink {
    fn info(&mut self, message: &str) {
        self.lines.push(SinkLine::Info(message.to_string()));
    }

    fn debug(&mut self, message: &str) {
        self.lines.push(SinkLine::Debug(message.to_string()));
    }

    fn warning(&mut self, message: &str) {
        self.lines.push(SinkLine::Warning(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.lines.push(SinkLine::Error(message.to_string()));
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<(), SinkError> {
        if self.reject_outputs {
            return Err(std::io::Error::other("output file unavailable").into());
        }
        self.outputs.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_failed(&mut self, message: &str) {
        self.failure = Some(message.to_string());
    }
}
