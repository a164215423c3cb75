//! # Service Configuration
//!
//! Environment-driven configuration with sane defaults. `DATABASE_URL`
//! selects the Postgres store; without it the server falls back to the
//! in-memory store.

use std::time::Duration;

use thiserror::Error;

/// Configuration errors raised while reading the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {variable}: {message}")]
    InvalidValue { variable: String, message: String },
}

/// Runtime configuration for the registry service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub bind_address: String,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Per-probe timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Trusted gateway header carrying the authenticated principal name.
    pub principal_header: String,
    /// Trusted gateway header carrying the principal's role claim.
    pub role_header: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8585".to_string(),
            database_url: None,
            probe_timeout_ms: 30_000,
            principal_header: "x-auth-principal".to_string(),
            role_header: "x-auth-role".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(bind_address) = std::env::var("REGISTRY_BIND_ADDRESS") {
            config.bind_address = bind_address;
        }

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            if !database_url.is_empty() {
                config.database_url = Some(database_url);
            }
        }

        if let Ok(timeout) = std::env::var("REGISTRY_PROBE_TIMEOUT_MS") {
            config.probe_timeout_ms = timeout.parse().map_err(|e| ConfigError::InvalidValue {
                variable: "REGISTRY_PROBE_TIMEOUT_MS".to_string(),
                message: format!("{e}"),
            })?;
        }

        if let Ok(header) = std::env::var("REGISTRY_PRINCIPAL_HEADER") {
            config.principal_header = header.to_ascii_lowercase();
        }

        if let Ok(header) = std::env::var("REGISTRY_ROLE_HEADER") {
            config.role_header = header.to_ascii_lowercase();
        }

        Ok(config)
    }

    /// Probe timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0:8585");
        assert!(config.database_url.is_none());
        assert_eq!(config.probe_timeout(), Duration::from_secs(30));
        assert_eq!(config.principal_header, "x-auth-principal");
        assert_eq!(config.role_header, "x-auth-role");
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        std::env::set_var("REGISTRY_PROBE_TIMEOUT_MS", "not-a-number");
        let result = ServiceConfig::from_env();
        std::env::remove_var("REGISTRY_PROBE_TIMEOUT_MS");
        assert!(result.is_err());
    }
}
