use std::path::PathBuf;

use color_eyre::eyre::Result;
use tracing::error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use tx_composer::config::get_data_dir;

const LOG_FILE: &str = "tx-composer.log";

/// Path of the log file inside the data directory.
pub fn log_path() -> PathBuf {
    get_data_dir().join(LOG_FILE)
}

/// Log to a file; the terminal belongs to the TUI.
pub fn init() -> Result<()> {
    std::fs::create_dir_all(get_data_dir())?;
    let log_file = std::fs::File::create(log_path())?;

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(true)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env().add_directive("tx_composer=debug".parse()?));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

/// Log a panic message and its location.
pub fn log_panic(panic: &std::panic::PanicHookInfo) {
    let msg = panic
        .payload()
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| panic.payload().downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload");

    let location = panic.location().map_or_else(
        || "unknown location".to_string(),
        |loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()),
    );

    error!("Panic at {}: {}", location, msg);
}
