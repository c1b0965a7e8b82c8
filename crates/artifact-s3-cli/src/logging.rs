use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber for the step's own diagnostics.
///
/// Stdout belongs to the pipeline runner: it carries workflow commands and
/// the step's log lines, so internal tracing events never go there. `RUST_LOG`
/// wins over `--log-level` when both are set.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
