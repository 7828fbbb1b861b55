//! CLI command implementations

pub mod budget;
pub mod demo;
pub mod export;
pub mod goal;
pub mod logs;
pub mod movements;
pub mod new;
pub mod remove;
pub mod scan;
pub mod setup;
pub mod shopping;
pub mod stats;
pub mod status;
pub mod voice;

use std::path::PathBuf;

use anyhow::{Context, Result};
use centavo_core::{CentavoContext, EntryPoint, LogEvent, LoggingService};
use chrono::NaiveDate;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let centavo_dir = get_centavo_dir();
    // Ensure directory exists
    std::fs::create_dir_all(&centavo_dir).ok()?;
    LoggingService::new(&centavo_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the centavo directory from environment or default
pub fn get_centavo_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CENTAVO_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".centavo")
    }
}

/// Get or create centavo context
pub fn get_context() -> Result<CentavoContext> {
    let centavo_dir = get_centavo_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&centavo_dir)
        .with_context(|| format!("Failed to create centavo directory: {:?}", centavo_dir))?;

    CentavoContext::new(&centavo_dir).context("Failed to initialize centavo context")
}

/// Parse an optional YYYY-MM-DD argument
pub fn parse_date_arg(value: Option<String>, flag: &str) -> Result<Option<NaiveDate>> {
    match value {
        Some(s) => {
            let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|_| anyhow::anyhow!("Invalid {} date '{}'. Use YYYY-MM-DD", flag, s))?;
            Ok(Some(date))
        }
        None => Ok(None),
    }
}
