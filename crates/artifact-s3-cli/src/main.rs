mod logging;

use std::process::ExitCode;

use artifact_s3_core::impls::{CommandUploader, WorkflowCommandSink};
use artifact_s3_core::ports::PipelineSink;
use artifact_s3_core::{Environment, run};
use clap::Parser;

/// Upload a build artifact to S3-compatible storage from a pipeline step.
///
/// Step inputs are read from `INPUT_*` environment variables.
#[derive(Parser)]
#[command(name = "upload-artifact-s3", version)]
struct Cli {
    /// Log level for internal diagnostics on stderr (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    let env = match Environment::from_process() {
        Ok(env) => env,
        Err(e) => {
            let mut sink = WorkflowCommandSink::new(std::io::stdout(), None);
            sink.set_failed(&format!("failed to read the working directory: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let uploader = CommandUploader::from_env(&env);
    let mut sink = WorkflowCommandSink::from_env(&env);

    let status = run(&env, &uploader, &mut sink).await;
    tracing::debug!(?status, "step finished");
    ExitCode::from(status.exit_code())
}
