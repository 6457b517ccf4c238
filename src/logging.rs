use std::fs;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// until the process is done logging.
#[must_use = "dropping the guard stops file logging"]
pub fn init_logging(log_dir: &str) -> WorkerGuard {
    let (non_blocking_writer, guard) = file_writer(log_dir);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stdout);

    // Respect RUST_LOG if set; otherwise verbose for this crate only
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("redfin_etl=debug,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}

/// Non-blocking daily rotated file, JSON encoded for log shipping
fn file_writer(log_dir: &str) -> (NonBlocking, WorkerGuard) {
    let _ = fs::create_dir_all(log_dir);
    let file_appender = tracing_appender::rolling::daily(log_dir, "redfin_etl.log");
    tracing_appender::non_blocking(file_appender)
}
