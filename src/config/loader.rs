//! Config file discovery and parsing

use crate::config::defaults::{CONFIG_ENV_VAR, PROJECT_CONFIG_FILE};
use crate::config::ServerConfig;
use crate::types::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the server configuration.
    ///
    /// An `explicit` path must exist; the implicit locations are optional and
    /// the first one present wins.
    pub fn load(explicit: Option<&Path>) -> Result<ServerConfig, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::read_file(path);
        }

        Self::load_first(&Self::candidates())
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            candidates.push(PathBuf::from(config_path));
        }

        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join(PROJECT_CONFIG_FILE));
        }

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("mathmcp").join("config.toml"));
        }

        candidates
    }

    fn load_first(candidates: &[PathBuf]) -> Result<ServerConfig, ConfigError> {
        for path in candidates {
            if path.exists() {
                return Self::read_file(path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(ServerConfig::default())
    }

    fn read_file(path: &Path) -> Result<ServerConfig, ConfigError> {
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
