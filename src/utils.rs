/// Small helpers shared by both binaries
use time::{format_description, OffsetDateTime};

/// Initialize env_logger at Info level with second-resolution timestamps.
///
/// `RUST_LOG` still takes precedence for individual modules.
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format.
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .ok()
        .and_then(|format| dt.format(&format).ok())
        .unwrap_or_else(|| dt.to_string())
}
