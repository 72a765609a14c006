//! Configuration management
//!
//! TOML file with a `_meta` header and one section per concern. Values can
//! be overridden through `WHEELHOUSE_*` environment variables, which keeps
//! container deployments away from config-file editing.

use crate::error::{Result, WheelhouseError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta", default)]
    pub meta: MetaConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            schema_version: "1".to_string(),
            created_at: current_timestamp(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Load the seed catalog on first `serve` against an empty database
    pub seed_on_start: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("~/.local/share/wheelhouse"),
            seed_on_start: true,
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4000".to_string(),
            max_connections: 64,
        }
    }
}

/// Query-interpreter defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default lower price bound implied by "дорогую"/"премиум"
    pub premium_price_floor: i64,
    /// Default lower price bound implied by "люкс"/"роскошную"
    pub luxury_price_floor: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            premium_price_floor: crate::query::DEFAULT_PREMIUM_FLOOR,
            luxury_price_floor: crate::query::DEFAULT_LUXURY_FLOOR,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig::default(),
            storage: StorageConfig::default(),
            server: ServerConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WheelhouseError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| WheelhouseError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| WheelhouseError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WheelhouseError::Config("Cannot determine config directory".into()))?;
        Ok(config_dir.join("wheelhouse").join("config.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("WHEELHOUSE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(bind) = std::env::var("WHEELHOUSE_BIND") {
            self.server.bind_addr = bind;
        }
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.server.max_connections == 0 {
            return Err(WheelhouseError::Config(
                "server.max_connections must be greater than zero".into(),
            ));
        }
        if self.server.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(WheelhouseError::Config(format!(
                "server.bind_addr is not a valid socket address: {}",
                self.server.bind_addr
            )));
        }
        if self.search.premium_price_floor <= 0 || self.search.luxury_price_floor <= 0 {
            return Err(WheelhouseError::Config(
                "search price floors must be positive".into(),
            ));
        }
        if self.search.luxury_price_floor < self.search.premium_price_floor {
            return Err(WheelhouseError::Config(
                "search.luxury_price_floor must not be below search.premium_price_floor".into(),
            ));
        }
        Ok(())
    }
}

/// Expand a leading `~/` against the user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::default();
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded.meta.schema_version, config.meta.schema_version);
        assert_eq!(loaded.server.bind_addr, config.server.bind_addr);
        assert_eq!(
            loaded.search.premium_price_floor,
            config.search.premium_price_floor
        );
    }

    #[test]
    fn test_missing_config_file_errors() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/config.toml")),
            Err(WheelhouseError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_bind_addr_rejected() {
        let mut config = Config::default();
        config.server.bind_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_floor_ordering_enforced() {
        let mut config = Config::default();
        config.search.premium_price_floor = 6_000_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        let path = PathBuf::from("/var/lib/wheelhouse");
        assert_eq!(expand_tilde(&path), path);
    }
}
