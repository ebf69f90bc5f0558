use tracing::Level;
use tracing_subscriber::prelude::*;

fn filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into())
}

/// Human-readable logs on stdout, for long-running services and batch jobs
pub fn init_tracing() {
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(filter())
        .with(stdout_layer)
        .init();
}

/// Logs on stderr so stdout stays machine-parsable
pub fn init_stderr_tracing() {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter())
        .with(stderr_layer)
        .init();
}
