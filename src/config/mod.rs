//! Gateway Configuration
//!
//! Connection URI, collection allow-list and bind address. Read once at
//! process start from a JSON file and/or the environment, immutable for the
//! process lifetime.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors are fatal; the process refuses to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(String),
    #[error("invalid config JSON: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// MongoDB connection URI; its path names the target database
    #[serde(default = "default_mongo_uri")]
    pub mongo_uri: String,

    /// Collections exposed as REST resources
    #[serde(default)]
    pub collections: Vec<String>,

    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_mongo_uri() -> String {
    "mongodb://127.0.0.1:27017/test".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mongo_uri: default_mongo_uri(),
            collections: Vec::new(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: GatewayConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Build configuration from the environment, starting from defaults.
    ///
    /// Recognized variables: `DOCGATE_MONGO_URI`, `DOCGATE_COLLECTIONS`
    /// (comma-separated), `DOCGATE_HOST`, `DOCGATE_PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay environment variables onto this configuration.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(uri) = std::env::var("DOCGATE_MONGO_URI") {
            self.mongo_uri = uri;
        }
        if let Ok(list) = std::env::var("DOCGATE_COLLECTIONS") {
            self.collections = parse_collection_list(&list);
        }
        if let Ok(host) = std::env::var("DOCGATE_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("DOCGATE_PORT") {
            self.port = port.parse().map_err(|_| {
                ConfigError::Invalid(format!("DOCGATE_PORT is not a port number: {}", port))
            })?;
        }
        Ok(())
    }

    /// Validate the assembled configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mongo_uri.starts_with("mongodb://")
            && !self.mongo_uri.starts_with("mongodb+srv://")
        {
            return Err(ConfigError::Invalid(format!(
                "mongo_uri must be a mongodb:// or mongodb+srv:// uri, got '{}'",
                self.mongo_uri
            )));
        }
        if self.collections.is_empty() {
            return Err(ConfigError::Invalid(
                "no collections configured; the gateway would expose nothing".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated collection list, dropping empty entries.
pub fn parse_collection_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
