//! ObjectGate Configuration
//!
//! This module provides configuration structures for the ObjectGate
//! storage gateway.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main ObjectGate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authorization configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Enable CORS
    #[serde(default)]
    pub cors_enabled: bool,
}

/// Authorization configuration
///
/// Both values are read once at startup and are immutable for the
/// lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret required for PUT and DELETE requests.
    /// When unset, all mutating requests are denied.
    #[serde(default)]
    pub secret: Option<String>,

    /// Keys readable without authentication
    #[serde(default = "default_allow_list")]
    pub allow_list: Vec<String>,
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend kind: "filesystem" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Root directory for the filesystem backend
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_allow_list() -> Vec<String> {
    vec!["worker.txt".to_string()]
}

fn default_backend() -> String {
    "filesystem".to_string()
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("/var/lib/objectgate")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            allow_list: default_allow_list(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            root: default_storage_root(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> crate::Result<Self> {
        let config: GatewayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a TOML file
    pub fn to_file(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("serialization failed: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.bind_address.is_empty() {
            return Err(crate::Error::Config(
                "server.bind_address cannot be empty".into(),
            ));
        }

        if self.server.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(crate::Error::Config(format!(
                "server.bind_address is not a valid socket address: {}",
                self.server.bind_address
            )));
        }

        match self.storage.backend.as_str() {
            "filesystem" => {
                if self.storage.root.as_os_str().is_empty() {
                    return Err(crate::Error::Config(
                        "storage.root cannot be empty for the filesystem backend".into(),
                    ));
                }
            }
            "memory" => {}
            other => {
                return Err(crate::Error::Config(format!(
                    "unknown storage backend: {} (expected \"filesystem\" or \"memory\")",
                    other
                )));
            }
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(crate::Error::Config(format!(
                    "unknown log level: {}",
                    other
                )));
            }
        }

        Ok(())
    }

    /// Build an example configuration for `objectgate init`
    pub fn example() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "0.0.0.0:8080".to_string(),
                cors_enabled: false,
            },
            auth: AuthConfig {
                secret: Some("change-me".to_string()),
                allow_list: default_allow_list(),
            },
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[server]
bind_address = "127.0.0.1:9090"
cors_enabled = true

[auth]
secret = "hunter2"
allow_list = ["worker.txt", "public/readme.md"]

[storage]
backend = "filesystem"
root = "/tmp/objectgate-data"

[logging]
level = "debug"
format = "json"
"#;

        let config = GatewayConfig::from_str(toml).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9090");
        assert!(config.server.cors_enabled);
        assert_eq!(config.auth.secret.as_deref(), Some("hunter2"));
        assert_eq!(config.auth.allow_list.len(), 2);
        assert_eq!(config.storage.backend, "filesystem");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_str("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert!(!config.server.cors_enabled);
        assert_eq!(config.auth.secret, None);
        assert_eq!(config.auth.allow_list, vec!["worker.txt".to_string()]);
        assert_eq!(config.storage.backend, "filesystem");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_invalid_bind_address() {
        let toml = r#"
[server]
bind_address = "not-an-address"
"#;
        assert!(GatewayConfig::from_str(toml).is_err());
    }

    #[test]
    fn test_unknown_backend() {
        let toml = r#"
[storage]
backend = "s3"
"#;
        assert!(GatewayConfig::from_str(toml).is_err());
    }

    #[test]
    fn test_unknown_log_level() {
        let toml = r#"
[logging]
level = "loud"
"#;
        assert!(GatewayConfig::from_str(toml).is_err());
    }

    #[test]
    fn test_example_roundtrip() {
        let example = GatewayConfig::example();
        example.validate().unwrap();

        let serialized = toml::to_string_pretty(&example).unwrap();
        let parsed = GatewayConfig::from_str(&serialized).unwrap();
        assert_eq!(parsed.auth.secret.as_deref(), Some("change-me"));
        assert_eq!(parsed.auth.allow_list, vec!["worker.txt".to_string()]);
    }
}
