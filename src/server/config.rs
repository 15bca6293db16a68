//! Configuration management for the RAX file API
//!
//! Built-in defaults, overridden by an optional `config.toml`, overridden by
//! `RAX_FILES__<SECTION>__<KEY>` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::stats::StatsEngine;
use crate::storage::FileStore;
use crate::storage::operations::{DEFAULT_FILE_MODE, DEFAULT_FOLDER_MODE};

const CONFIG_FILE: &str = "config";
const ENV_PREFIX: &str = "RAX_FILES";

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: NetworkConfig,
    pub storage: StorageConfig,
    pub stats: StatsConfig,
}

/// HTTP listener settings (restart required)
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    /// IP address to bind
    pub bind_address: String,
    pub port: u16,
    /// Maximum accepted request body size
    pub max_body_bytes: usize,
}

/// Storage root and permissions for created entries
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub root: String,
    pub folder_mode: u32,
    pub file_mode: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    /// Descend into subdirectories when computing statistics
    pub recursive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: NetworkConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 8000,
                max_body_bytes: 2 * 1024 * 1024,
            },
            storage: StorageConfig {
                root: "filesys".to_string(),
                folder_mode: DEFAULT_FOLDER_MODE,
                file_mode: DEFAULT_FILE_MODE,
            },
            stats: StatsConfig { recursive: false },
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let settings = Config::builder()
            .set_default("server.bind_address", defaults.server.bind_address)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.max_body_bytes", defaults.server.max_body_bytes as i64)?
            .set_default("storage.root", defaults.storage.root)?
            .set_default("storage.folder_mode", i64::from(defaults.storage.folder_mode))?
            .set_default("storage.file_mode", i64::from(defaults.storage.file_mode))?
            .set_default("stats.recursive", defaults.stats.recursive)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Message(
                "max_body_bytes must be greater than 0".into(),
            ));
        }

        if self.storage.root.is_empty() {
            return Err(ConfigError::Message("storage root cannot be empty".into()));
        }

        if self.storage.folder_mode > 0o7777 || self.storage.file_mode > 0o7777 {
            return Err(ConfigError::Message(
                "folder_mode and file_mode must be valid permission bits".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.bind_address, self.server.port)
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid bind address: {}", e)))
    }

    /// Get storage root as PathBuf
    pub fn storage_root_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.root)
    }

    pub fn file_store(&self) -> FileStore {
        FileStore::new(self.storage.folder_mode, self.storage.file_mode)
    }

    pub fn stats_engine(&self) -> StatsEngine {
        StatsEngine::new(self.stats.recursive)
    }
}
