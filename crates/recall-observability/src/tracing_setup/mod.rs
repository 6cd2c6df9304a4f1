//! Tracing setup: structured logging with an env-driven filter.

pub mod events;

use recall_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "RECALL_LOG";

/// Initialize the tracing subscriber with structured JSON output.
///
/// Respects the `RECALL_LOG` environment variable for filtering.
/// Defaults to `info` level if not set.
pub fn init_tracing() {
    init_from_config(&ObservabilityConfig::default());
}

/// Initialize tracing from the `[observability]` config section.
///
/// `RECALL_LOG` still wins over `log_level` when set. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_from_config(config: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let _ = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let filter = EnvFilter::new(filter);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_test_writer()
        .try_init();
}
