//! Configuration management for the Echo Ledger client
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files and environment variables.

use crate::error::{EchoLedgerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main configuration structure for the Echo Ledger client
///
/// This structure holds everything the client needs to reach the backend:
/// the REST API endpoint, the push-channel endpoint, and whether the
/// backend runs in the non-production echo-OTP mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Push channel (WebSocket) settings
    #[serde(default)]
    pub socket: SocketConfig,

    /// Whether the backend echoes the issued OTP back in the send response.
    /// Explicitly insecure; only ever true against dev backends.
    #[serde(default)]
    pub dev_mode: bool,
}

/// REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the versioned REST API
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api/v1".to_string()
}

fn default_api_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

/// Push channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketConfig {
    /// WebSocket URL for the push channel
    #[serde(default = "default_socket_url")]
    pub url: String,

    /// Connect timeout in seconds
    #[serde(default = "default_socket_timeout")]
    pub connect_timeout_seconds: u64,
}

fn default_socket_url() -> String {
    "ws://localhost:5000/ws".to_string()
}

fn default_socket_timeout() -> u64 {
    5
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            url: default_socket_url(),
            connect_timeout_seconds: default_socket_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            socket: SocketConfig::default(),
            dev_mode: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, falling back to defaults when
    /// the file does not exist
    ///
    /// Environment variables take precedence over file values:
    /// `ECHOLEDGER_API_URL`, `ECHOLEDGER_SOCKET_URL`, and
    /// `ECHOLEDGER_DEV_MODE` (any value other than `0`/`false` enables it).
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(EchoLedgerError::Io)?;
            let config: Config = serde_yaml::from_str(&contents)?;
            tracing::debug!("Loaded configuration from {}", path.display());
            config
        } else {
            tracing::debug!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment-variable overrides on top of file values
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ECHOLEDGER_API_URL") {
            if !url.is_empty() {
                tracing::debug!("Overriding API base URL from environment");
                self.api.base_url = url;
            }
        }
        if let Ok(url) = std::env::var("ECHOLEDGER_SOCKET_URL") {
            if !url.is_empty() {
                tracing::debug!("Overriding socket URL from environment");
                self.socket.url = url;
            }
        }
        if let Ok(flag) = std::env::var("ECHOLEDGER_DEV_MODE") {
            self.dev_mode = !matches!(flag.as_str(), "" | "0" | "false");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if a URL does not parse or a timeout is zero
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url).map_err(|e| {
            EchoLedgerError::Config(format!("Invalid API base URL '{}': {}", self.api.base_url, e))
        })?;

        let socket_url = Url::parse(&self.socket.url).map_err(|e| {
            EchoLedgerError::Config(format!("Invalid socket URL '{}': {}", self.socket.url, e))
        })?;
        if socket_url.scheme() != "ws" && socket_url.scheme() != "wss" {
            return Err(EchoLedgerError::Config(format!(
                "Socket URL must use ws:// or wss://, got '{}'",
                self.socket.url
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(
                EchoLedgerError::Config("API timeout must be greater than zero".to_string()).into(),
            );
        }
        if self.socket.connect_timeout_seconds == 0 {
            return Err(EchoLedgerError::Config(
                "Socket connect timeout must be greater than zero".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
