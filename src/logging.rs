use crate::{CONSOLE_TARGET, Error};
use std::path::Path;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default log directory name
pub const LOG_DIR: &str = "logs";
/// Registry log file name
pub const REGISTRY_LOG_FILE: &str = "registry";

/// Initialize the logging system with console and file outputs
pub fn init() -> Result<(), Error> {
    init_with_dir(LOG_DIR)
}

/// Initialize logging with an explicit log directory
pub fn init_with_dir(log_dir: impl AsRef<Path>) -> Result<(), Error> {
    let log_dir = log_dir.as_ref();

    // Create log directory if it doesn't exist
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    // Set up file appender with daily rotation
    let registry_file = RollingFileAppender::new(Rotation::DAILY, log_dir, REGISTRY_LOG_FILE);

    // Create a layer for console output (human-readable format)
    let console_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(true);

    // Create a layer for registry logs (JSON format)
    let registry_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(false)
        .json()
        .with_writer(registry_file);

    // Set up the subscriber with all layers
    // Use env filter to allow runtime configuration of log levels
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(registry_layer)
        .init();

    info!("Logging system initialized");
    Ok(())
}

pub fn log_console(message: String) {
    info!(
        target: CONSOLE_TARGET,
        message = %message,
        event = "console",
    );
}
