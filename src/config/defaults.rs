//! Built-in fallbacks used when no config file sets a value

pub const DEFAULT_SERVER_NAME: &str = "mathmcp";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable naming an alternate config file
pub const CONFIG_ENV_VAR: &str = "MATHMCP_CONFIG";

/// Project-local config file, looked up in the current directory
pub const PROJECT_CONFIG_FILE: &str = ".mathmcp.toml";
