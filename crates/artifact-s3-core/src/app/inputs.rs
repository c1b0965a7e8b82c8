//! InputResolver - raw step inputs and environment
//!
//! Every read of the process environment happens once, in
//! [`Environment::from_process`]. Everything downstream works on that
//! snapshot, so tests build an `Environment` by hand instead of mutating
//! the real one.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::{ConfigError, DEFAULT_REGION, NoFilesFoundPolicy};

pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_RUN_ID: &str = "GITHUB_RUN_ID";
pub const ENV_RUN_ATTEMPT: &str = "GITHUB_RUN_ATTEMPT";
pub const ENV_WORKSPACE: &str = "GITHUB_WORKSPACE";
pub const ENV_OUTPUT_FILE: &str = "GITHUB_OUTPUT";
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Snapshot of the environment a run sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
    working_dir: PathBuf,
}

impl Environment {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            working_dir: working_dir.into(),
        }
    }

    /// Capture the current process environment and working directory.
    ///
    /// Variables that are not valid unicode are skipped.
    pub fn from_process() -> io::Result<Self> {
        Ok(Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
            working_dir: std::env::current_dir()?,
        })
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Set step input `name` the way the pipeline runner does.
    pub fn with_input(self, name: &str, value: impl Into<String>) -> Self {
        self.with_var(input_key(name), value)
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

/// Environment variable carrying step input `name`: `INPUT_` + upper-cased
/// name with spaces replaced by `_`. Hyphens are kept.
pub fn input_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Parse a base-10 integer the lenient way.
///
/// Leading whitespace and an optional sign are accepted, then digits up to
/// the first non-digit: `"12abc"` is 12, `" -3"` is -3. `None` means "not a
/// number" (no digits, or a value outside `i64`).
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        let d = i64::from(b - b'0');
        value = value.checked_mul(10)?;
        value = if negative {
            value.checked_sub(d)?
        } else {
            value.checked_add(d)?
        };
    }
    Some(value)
}

/// Reads step inputs and environment variables with defaults.
///
/// Presence is the only thing checked here; values are interpreted by the
/// assembler.
#[derive(Debug, Clone, Copy)]
pub struct InputResolver<'a> {
    env: &'a Environment,
}

impl<'a> InputResolver<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Trimmed input value, empty when unset.
    pub fn input(&self, name: &str) -> &'a str {
        self.env.var(&input_key(name)).map_or("", str::trim)
    }

    pub fn required_input(&self, name: &str) -> Result<&'a str, ConfigError> {
        match self.input(name) {
            "" => Err(ConfigError::MissingInput {
                name: name.to_string(),
            }),
            value => Ok(value),
        }
    }

    /// `None` when unset or empty.
    pub fn optional_input(&self, name: &str) -> Option<&'a str> {
        Some(self.input(name)).filter(|v| !v.is_empty())
    }

    pub fn input_or(&self, name: &str, default: &'a str) -> &'a str {
        self.optional_input(name).unwrap_or(default)
    }

    /// `true` only for the exact string `"true"`.
    pub fn bool_input(&self, name: &str) -> bool {
        self.input(name) == "true"
    }

    /// Integer input, falling back to `default` when empty.
    pub fn int_input(&self, name: &str, default: &str) -> Option<i64> {
        parse_int(self.optional_input(name).unwrap_or(default))
    }

    /// Environment variable, `None` when unset or empty.
    pub fn var(&self, key: &str) -> Option<&'a str> {
        self.env.var(key).filter(|v| !v.is_empty())
    }

    /// Environment variable, falling back to `default` when unset or empty.
    pub fn env_or(&self, key: &str, default: &'a str) -> &'a str {
        self.var(key).unwrap_or(default)
    }
}

/// Step inputs after presence checks and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInputs {
    pub name: String,
    /// The `path` input exactly as given (multi-line).
    pub path: String,
    pub if_no_files_found: NoFilesFoundPolicy,
    /// `None` when not a number.
    pub retention_days: Option<i64>,
    /// `None` when not a number.
    pub compression_level: Option<i64>,
    pub overwrite: bool,
    pub include_hidden_files: bool,
    pub s3_bucket: String,
    pub s3_prefix: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    pub s3_force_path_style: bool,
}

impl RawInputs {
    /// Resolve all inputs. Fails on the first missing required input.
    pub fn resolve(env: &Environment) -> Result<Self, ConfigError> {
        let inputs = InputResolver::new(env);

        let name = inputs.input_or("name", crate::domain::DEFAULT_ARTIFACT_NAME);
        let path = inputs.required_input("path")?;
        let if_no_files_found = NoFilesFoundPolicy::from_input(inputs.input("if-no-files-found"));
        let retention_days = inputs.int_input("retention-days", "0");
        let compression_level = inputs.int_input("compression-level", "6");
        let overwrite = inputs.bool_input("overwrite");
        let include_hidden_files = inputs.bool_input("include-hidden-files");

        let s3_bucket = inputs.required_input("s3-bucket")?;

        Ok(Self {
            name: name.to_string(),
            path: path.to_string(),
            if_no_files_found,
            retention_days,
            compression_level,
            overwrite,
            include_hidden_files,
            s3_bucket: s3_bucket.to_string(),
            s3_prefix: inputs.optional_input("s3-prefix").map(str::to_owned),
            s3_endpoint: inputs.optional_input("s3-endpoint").map(str::to_owned),
            s3_region: inputs.input_or("s3-region", DEFAULT_REGION).to_string(),
            s3_force_path_style: inputs.bool_input("s3-force-path-style"),
        })
    }
}
