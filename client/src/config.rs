//! Configuration for the todolist client binary.

use serde::{Deserialize, Serialize};
use std::env;
use todolist_api::{LoginParams, DEFAULT_API_URL};

/// Default `tracing` filter
pub const DEFAULT_LOG_LEVEL: &str = "todolist=info";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `TODOLIST_API_KEY` is not set
    #[error("TODOLIST_API_KEY must be set")]
    MissingApiKey,

    /// A variable holds a value that cannot be parsed
    #[error("{name} has an invalid value: {value}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API connection
    pub api: ApiConfig,
    /// Credentials to log in with when no session is active
    pub credentials: Option<Credentials>,
    /// `tracing` filter directive
    pub log_level: String,
}

/// API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root
    pub url: String,
    /// Value of the `API-KEY` header
    pub key: String,
}

/// Login credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Ask the server for a long-lived session
    pub remember_me: bool,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

impl Credentials {
    /// Login request for these credentials
    #[must_use]
    pub fn login_params(&self) -> LoginParams {
        LoginParams::new(self.email.clone(), self.password.clone(), self.remember_me)
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `TODOLIST_API_URL` | the public API root |
    /// | `TODOLIST_API_KEY` | required |
    /// | `TODOLIST_EMAIL`, `TODOLIST_PASSWORD` | unset (no login) |
    /// | `TODOLIST_REMEMBER_ME` | `false` |
    /// | `TODOLIST_LOG_LEVEL` | `todolist=info` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API key is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API key is missing or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup("TODOLIST_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let remember_me = match lookup("TODOLIST_REMEMBER_ME") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                name: "TODOLIST_REMEMBER_ME",
                value,
            })?,
            None => false,
        };

        let credentials = match (lookup("TODOLIST_EMAIL"), lookup("TODOLIST_PASSWORD")) {
            (Some(email), Some(password)) => Some(Credentials {
                email,
                password,
                remember_me,
            }),
            _ => None,
        };

        Ok(Self {
            api: ApiConfig {
                url: lookup("TODOLIST_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                key,
            },
            credentials,
            log_level: lookup("TODOLIST_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
