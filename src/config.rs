//! Configuration loading and management
//!
//! Handles parsing of `tasklist.toml` configuration files.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "tasklist.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Client configuration
    #[serde(default)]
    pub client: ClientConfig,
}

/// Settings for `tasklist serve`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_addr")]
    pub addr: String,

    /// JSON file holding the task state
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data/tasks.json")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            data_file: default_data_file(),
        }
    }
}

/// Settings for the client subcommands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the task server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from a `tasklist.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `dir/tasklist.toml`, or return defaults
    ///
    /// A file that is missing or fails to load yields the defaults.
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            match Self::load(&config_path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %config_path.display(), "ignoring config: {err}");
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Resolve configuration for the CLI
    ///
    /// An explicit path must exist and load cleanly; otherwise the working
    /// directory is searched leniently.
    pub fn resolve(explicit: Option<&Path>) -> crate::error::Result<Self> {
        match explicit {
            Some(path) if !path.is_file() => Err(crate::error::Error::InvalidConfig(format!(
                "config file not found: {}",
                path.display()
            ))),
            Some(path) => Self::load(path),
            None => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                Ok(Self::load_from_dir(&cwd))
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.server.validate()?;
        self.client.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    /// Parsed listen address
    pub fn socket_addr(&self) -> crate::error::Result<SocketAddr> {
        self.addr.trim().parse().map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "server.addr: invalid socket address '{}'",
                self.addr
            ))
        })
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.socket_addr()?;
        if self.data_file.as_os_str().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "server.data_file cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl ClientConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "client.base_url cannot be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "client.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
