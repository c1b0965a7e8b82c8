//! artifact-s3-core
//!
//! Core of the `upload-artifact-s3` pipeline step: turns step inputs into an
//! upload request, hands it to an external uploader, and reports the outcome
//! back to the pipeline.
//!
//! # Modules
//! - **domain**: StorageConfig, RunContext, UploadRequest, outcomes, decisions, errors
//! - **ports**: ArtifactUploader, PipelineSink
//! - **app**: input resolution, assembly, the upload call, reporting, `run`
//! - **impls**: process-backed uploader, workflow-command sink, test doubles

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{Environment, RunStatus, run};
