//! WorkflowCommandSink - PipelineSink speaking the runner's workflow commands
//!
//! # Protocol
//! - info → plain line on stdout
//! - debug / warning / error → `::debug::msg`, `::warning::msg`, `::error::msg`
//! - outputs → appended to the file named by `GITHUB_OUTPUT` as a heredoc
//!   block, or `::set-output name=..::value` when that variable is unset

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;
use ulid::Ulid;

use crate::app::inputs::{ENV_OUTPUT_FILE, Environment, InputResolver};
use crate::ports::{PipelineSink, SinkError};

/// Escape a command message: `%`, `\r`, `\n`.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escape a command property value: as [`escape_data`], plus `:` and `,`.
pub fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

pub struct WorkflowCommandSink<W: Write> {
    out: W,
    output_file: Option<PathBuf>,
}

impl WorkflowCommandSink<io::Stdout> {
    /// Stdout sink writing outputs to `GITHUB_OUTPUT` when set.
    pub fn from_env(env: &Environment) -> Self {
        let output_file = InputResolver::new(env).var(ENV_OUTPUT_FILE).map(PathBuf::from);
        Self::new(io::stdout(), output_file)
    }
}

impl<W: Write> WorkflowCommandSink<W> {
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self {
            out,
            output_file,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            warn!(error = %e, "failed to write to pipeline log");
        }
    }

    fn command(&mut self, name: &str, properties: &[(&str, &str)], message: &str) {
        let mut cmd = format!("::{name}");
        if !properties.is_empty() {
            let props: Vec<String> = properties
                .iter()
                .map(|(k, v)| format!("{k}={}", escape_property(v)))
                .collect();
            cmd.push(' ');
            cmd.push_str(&props.join(","));
        }
        cmd.push_str("::");
        cmd.push_str(&escape_data(message));
        self.line(&cmd);
    }

    fn append_output(&self, path: &Path, name: &str, value: &str) -> Result<(), SinkError> {
        let delimiter = format!("ghadelimiter_{}", Ulid::new());
        if name.contains(&delimiter) || value.contains(&delimiter) {
            return Err(SinkError::DelimiterCollision(delimiter));
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n")?;
        Ok(())
    }
}

impl<W: Write> PipelineSink for WorkflowCommandSink<W> {
    fn info(&mut self, message: &str) {
        self.line(message);
    }

    fn debug(&mut self, message: &str) {
        self.command("debug", &[], message);
    }

    fn warning(&mut self, message: &str) {
        self.command("warning", &[], message);
    }

    fn error(&mut self, message: &str) {
        self.command("error", &[], message);
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<(), SinkError> {
        match &self.output_file {
            Some(path) => self.append_output(path, name, value),
            None => {
                self.command("set-output", &[("name", name)], value);
                Ok(())
            }
        }
    }

    fn set_failed(&mut self, message: &str) {
        self.error(message);
    }
}
