//! Runtime configuration.
//!
//! ## Environment Variables
//! - `PETFINDER_CLIENT_ID`: API client identifier (required)
//! - `PETFINDER_CLIENT_SECRET`: API client secret (defaults to empty)
//! - `PETFINDER_BASE_URL`: API root (defaults to the production API)
//!
//! A `.env` file in the working directory is loaded first when present;
//! variables already set in the environment win.

use petboard_core::{Credentials, DEFAULT_BASE_URL};
use thiserror::Error;

pub const CLIENT_ID_VAR: &str = "PETFINDER_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "PETFINDER_CLIENT_SECRET";
pub const BASE_URL_VAR: &str = "PETFINDER_BASE_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("{name} must be an http(s) URL, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub credentials: Credentials,
    pub base_url: String,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let client_id = get(CLIENT_ID_VAR).ok_or(ConfigError::Missing(CLIENT_ID_VAR))?;
        let client_secret = get(CLIENT_SECRET_VAR).unwrap_or_default();
        let config = Self {
            credentials: Credentials::new(client_id, client_secret),
            base_url: DEFAULT_BASE_URL.to_string(),
        };
        match get(BASE_URL_VAR) {
            Some(base_url) => config.with_base_url(&base_url),
            None => Ok(config),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                name: BASE_URL_VAR,
                value: base_url.to_string(),
            });
        }
        self.base_url = base_url.to_string();
        Ok(self)
    }
}
