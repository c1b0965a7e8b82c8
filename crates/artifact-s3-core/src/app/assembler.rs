//! ConfigAssembler / RequestBuilder
//!
//! Pure functions from [`RawInputs`] + [`Environment`] to the values handed to
//! the uploader. No I/O: the root directory is resolved lexically.

use std::path::{Component, Path, PathBuf};

use crate::domain::{CompressionLevel, RunContext, StorageConfig, UploadRequest, parse_paths};

use super::inputs::{
    ENV_REPOSITORY, ENV_RUN_ATTEMPT, ENV_RUN_ID, ENV_WORKSPACE, Environment, InputResolver,
    RawInputs, parse_int,
};

/// Everything a single upload call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub storage: StorageConfig,
    pub context: RunContext,
    pub request: UploadRequest,
}

/// Build the storage target and the run context.
pub fn assemble_config(inputs: &RawInputs, env: &Environment) -> (StorageConfig, RunContext) {
    let storage = StorageConfig::new(
        inputs.s3_bucket.clone(),
        inputs.s3_prefix.clone(),
        inputs.s3_endpoint.clone(),
        inputs.s3_region.clone(),
        inputs.s3_force_path_style,
    );
    (storage, run_context(env))
}

/// Run identity from the pipeline environment. Unset or unparseable values
/// fall back to the [`RunContext`] defaults.
pub fn run_context(env: &Environment) -> RunContext {
    let vars = InputResolver::new(env);
    RunContext {
        repository: vars
            .env_or(ENV_REPOSITORY, RunContext::UNKNOWN_REPOSITORY)
            .to_string(),
        run_id: vars
            .var(ENV_RUN_ID)
            .and_then(parse_int)
            .unwrap_or(RunContext::DEFAULT_RUN_ID),
        run_attempt: vars
            .var(ENV_RUN_ATTEMPT)
            .and_then(parse_int)
            .unwrap_or(RunContext::DEFAULT_RUN_ATTEMPT),
    }
}

/// `GITHUB_WORKSPACE` if set, else the working directory, made absolute.
pub fn resolve_root_directory(env: &Environment) -> PathBuf {
    let workspace = InputResolver::new(env)
        .var(ENV_WORKSPACE)
        .map(Path::new)
        .unwrap_or_else(|| env.working_dir());
    absolutize(env.working_dir(), workspace)
}

/// Join `path` onto `base` unless already absolute, then fold `.` and `..`.
fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Build the upload request.
pub fn build_request(inputs: &RawInputs, root_directory: PathBuf) -> UploadRequest {
    UploadRequest {
        name: inputs.name.clone(),
        paths: parse_paths(&inputs.path),
        root_directory,
        retention_days: inputs
            .retention_days
            .filter(|days| *days > 0)
            .and_then(|days| u32::try_from(days).ok()),
        compression_level: CompressionLevel::from(inputs.compression_level),
        overwrite: inputs.overwrite,
        include_hidden_files: inputs.include_hidden_files,
    }
}

pub fn assemble(inputs: &RawInputs, env: &Environment) -> Assembled {
    let (storage, context) = assemble_config(inputs, env);
    let request = build_request(inputs, resolve_root_directory(env));
    Assembled {
        storage,
        context,
        request,
    }
}
