//! Configuration system for mathmcp
//!
//! A single optional TOML file, found in this order:
//! 1. `--config <PATH>` on the command line
//! 2. `$MATHMCP_CONFIG`
//! 3. `./.mathmcp.toml`
//! 4. `~/.config/mathmcp/config.toml`
//!
//! With no file present every setting falls back to its built-in default.

mod defaults;
mod loader;
mod user_config;

pub use defaults::{DEFAULT_LOG_LEVEL, DEFAULT_SERVER_NAME};
pub use loader::ConfigLoader;
pub use user_config::{LoggingSettings, ServerConfig, ServerSettings};
