//! Ports - seams to the outside world
//!
//! Each trait here is an interface to something this crate does not own:
//! - **ArtifactUploader**: the external collaborator that transfers files to object storage
//! - **PipelineSink**: the pipeline runner's log / output / failure channel

pub mod pipeline_sink;
pub mod uploader;

pub use self::pipeline_sink::{PipelineSink, SinkError};
pub use self::uploader::ArtifactUploader;
