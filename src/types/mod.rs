//! Shared error types

mod errors;

pub use errors::{ConfigError, Result, ToolError};
