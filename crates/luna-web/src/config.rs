//! Configuration file parsing for the web server.
//!
//! Loads the bind address and port plus an `[oracle]` table with the same
//! keys the CLI profiles use.

use crate::session::{SessionStore, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL};
use luna_oracle::OracleConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Web configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Values out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Web server configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 5000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Seconds a browser session may sit idle before it is forgotten
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Most browser sessions kept in memory at once
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Oracle settings shared by every session
    #[serde(default)]
    pub oracle: OracleConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    5000
}

fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL.as_secs()
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

impl WebConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: WebConfig = toml::from_str(contents)?;

        if config.session_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "session_ttl_secs must be greater than zero".to_string(),
            ));
        }
        if config.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "max_sessions must be greater than zero".to_string(),
            ));
        }

        config
            .oracle
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(config)
    }

    /// Create a default configuration for local use
    pub fn default_test_config() -> Self {
        WebConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            session_ttl_secs: default_session_ttl_secs(),
            max_sessions: default_max_sessions(),
            oracle: OracleConfig::default(),
        }
    }

    /// An empty session store with this configuration's limits
    pub fn session_store(&self) -> SessionStore {
        SessionStore::with_limits(
            Duration::from_secs(self.session_ttl_secs),
            self.max_sessions,
        )
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
