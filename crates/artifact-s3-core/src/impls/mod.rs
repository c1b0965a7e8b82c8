//! Impls - ports の実装
//!
//! # 本番用
//! - **CommandUploader**: runs the external uploader process
//! - **WorkflowCommandSink**: workflow commands on stdout + `GITHUB_OUTPUT`
//!
//! # テスト用
//! - **ScriptedUploader**: canned answer, records the request
//! - **RecordingSink**: keeps every line and output in memory

pub mod command_uploader;
pub mod recording_sink;
pub mod scripted_uploader;
pub mod workflow_sink;

// 主要な型を再エクスポート
pub use self::command_uploader::{CommandUploader, DEFAULT_UPLOADER, ENV_UPLOADER};
pub use self::recording_sink::{RecordingSink, SinkLine};
pub use self::scripted_uploader::ScriptedUploader;
pub use self::workflow_sink::WorkflowCommandSink;
