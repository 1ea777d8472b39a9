//! mathmcp - arithmetic and math-fact tools over Model Context Protocol
//!
//! A small stdio server that advertises a fixed set of tools (`add`,
//! `multiply`, `get_random_fact`) and executes them on request from an
//! MCP client.

pub mod config;
pub mod mcp;
pub mod types;

pub use config::{ConfigLoader, ServerConfig};
pub use mcp::{McpServer, ToolRegistry};
pub use types::{ConfigError, ToolError};
