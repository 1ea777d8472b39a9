//! Config file schema

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{DEFAULT_LOG_LEVEL, DEFAULT_SERVER_NAME};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Name reported in `serverInfo` during `initialize`
    pub name: Option<String>,
    /// Request lines longer than this many bytes are rejected and skipped
    pub max_line_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn server_name(&self) -> &str {
        self.server.name.as_deref().unwrap_or(DEFAULT_SERVER_NAME)
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
