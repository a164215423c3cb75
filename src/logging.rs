//! # Structured Logging
//!
//! Environment-aware tracing initialization. Safe to call more than once;
//! embedding callers (tests, a host process with its own subscriber) keep
//! whatever subscriber is already installed.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with an environment-specific default level.
///
/// `RUST_LOG` overrides everything; otherwise the level is derived from
/// `REGISTRY_ENV`/`APP_ENV`.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_log_level(&environment)));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(filter),
        );

        // A global subscriber may already be set by the embedding process.
        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }

        tracing::debug!(environment = %environment, "logging initialized");
    });
}

/// Current deployment environment from environment variables.
fn get_environment() -> String {
    std::env::var("REGISTRY_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Default log level for an environment when `RUST_LOG` is unset.
fn default_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}
