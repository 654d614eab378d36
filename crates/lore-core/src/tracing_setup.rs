//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "lore=info";

/// Initialize the lore tracing/logging system.
///
/// Reads the `LORE_LOG` environment variable for per-crate log levels.
/// Format: `LORE_LOG=lore_extraction=debug,lore_pipeline=info`
///
/// Falls back to `lore=info` if `LORE_LOG` is not set or is invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    init_with(&ObservabilityConfig {
        log_level: DEFAULT_FILTER.to_string(),
        json_logs: false,
    });
}

/// Same as [`init_tracing`] but emits JSON lines.
pub fn init_tracing_json() {
    init_with(&ObservabilityConfig {
        log_level: DEFAULT_FILTER.to_string(),
        json_logs: true,
    });
}

/// Initialize tracing from an observability config section.
///
/// `LORE_LOG` still wins over `config.log_level` when set.
pub fn init_with(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

        if config.json_logs {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
        }
    });
}
