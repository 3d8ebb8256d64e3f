//! Service configuration from environment variables.
//!
//! A missing model credential is fatal at startup; everything else has a
//! sensible default. `.env` files are honored via `dotenvy` in `main`.

use std::net::SocketAddr;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Dr. Hipocrates";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default model: fast and cheap, with a context window large enough for a
/// whole triage conversation plus the record log.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8420";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub bind_addr: SocketAddr,
    pub model: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let bind_addr = match std::env::var("HIPOCRATES_ADDR") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: "HIPOCRATES_ADDR",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_BIND_ADDR.parse().expect("default bind address"),
        };

        let model =
            std::env::var("HIPOCRATES_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = match std::env::var("HIPOCRATES_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: "HIPOCRATES_TIMEOUT_SECS",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            bind_addr,
            model,
            timeout_secs,
        })
    }
}

/// Build a config without touching the environment (test support).
#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        api_key: "test-key".into(),
        bind_addr: DEFAULT_BIND_ADDR.parse().unwrap(),
        model: DEFAULT_MODEL.into(),
        timeout_secs: 5,
    }
}
