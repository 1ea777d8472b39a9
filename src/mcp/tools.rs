//! MCP tools implementation
//!
//! The tool set is closed: `add`, `multiply` and `get_random_fact`. The
//! registry owns their descriptors and dispatches calls by name.

use crate::mcp::protocol::{CallToolResult, Tool};
use crate::types::{Result, ToolError};
use rand::seq::SliceRandom;
use serde_json::{json, Value};
use std::fmt;
use tracing::debug;

pub const MATH_FACTS: [&str; 5] = [
    "Zero is the only number that cannot be written in Roman numerals.",
    "A googol is 10 raised to the power of 100.",
    "The repeating decimal 0.999... is exactly equal to 1.",
    "Pi has been computed to more than 100 trillion decimal places.",
    "Every prime number greater than 3 is one more or one less than a multiple of 6.",
];

/// Identifier of a registered tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolId {
    Add,
    Multiply,
    GetRandomFact,
}

impl ToolId {
    /// Declaration order, which is also the `tools/list` order
    pub const ALL: [ToolId; 3] = [ToolId::Add, ToolId::Multiply, ToolId::GetRandomFact];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(ToolId::Add),
            "multiply" => Some(ToolId::Multiply),
            "get_random_fact" => Some(ToolId::GetRandomFact),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolId::Add => "add",
            ToolId::Multiply => "multiply",
            ToolId::GetRandomFact => "get_random_fact",
        }
    }

    fn descriptor(self) -> Tool {
        match self {
            ToolId::Add => Tool {
                name: self.name().to_string(),
                description: "Add two numbers together".to_string(),
                input_schema: binary_operands_schema("First number", "Second number"),
            },
            ToolId::Multiply => Tool {
                name: self.name().to_string(),
                description: "Multiply two numbers together".to_string(),
                input_schema: binary_operands_schema("First number", "Second number"),
            },
            ToolId::GetRandomFact => Tool {
                name: self.name().to_string(),
                description: "Get a random math fact".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn binary_operands_schema(a: &str, b: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "a": {
                "type": "number",
                "description": a
            },
            "b": {
                "type": "number",
                "description": b
            }
        },
        "required": ["a", "b"]
    })
}

/// Fixed set of tool descriptors, built once at startup
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: ToolId::ALL.iter().map(|id| id.descriptor()).collect(),
        }
    }

    pub fn list_tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Call a tool by name
    pub fn call_tool(&self, name: &str, arguments: Option<&Value>) -> Result<CallToolResult> {
        let id = ToolId::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        debug!("Dispatching tool: {}", id);

        match id {
            ToolId::Add => {
                let (a, b) = binary_operands(id, arguments)?;
                Ok(CallToolResult::text(format!(
                    "{} + {} = {}",
                    format_number(a),
                    format_number(b),
                    format_number(a + b)
                )))
            }
            ToolId::Multiply => {
                let (a, b) = binary_operands(id, arguments)?;
                Ok(CallToolResult::text(format!(
                    "{} × {} = {}",
                    format_number(a),
                    format_number(b),
                    format_number(a * b)
                )))
            }
            ToolId::GetRandomFact => {
                let fact = MATH_FACTS
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(MATH_FACTS[0]);
                Ok(CallToolResult::text(format!("Math Fact: {}", fact)))
            }
        }
    }
}

fn binary_operands(tool: ToolId, arguments: Option<&Value>) -> Result<(f64, f64)> {
    let invalid = |reason: String| ToolError::InvalidArguments {
        tool: tool.name().to_string(),
        reason,
    };

    let args = match arguments {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => return Err(invalid("missing required argument 'a'".into())),
        Some(_) => return Err(invalid("arguments must be an object".into())),
    };

    let number = |key: &str| -> Result<f64> {
        match args.get(key) {
            None | Some(Value::Null) => Err(invalid(format!("missing required argument '{}'", key))),
            Some(value) => value
                .as_f64()
                .ok_or_else(|| invalid(format!("argument '{}' must be a number, got {}", key, value))),
        }
    };

    Ok((number("a")?, number("b")?))
}

/// Render a double the way a script host would: no trailing `.0`, a
/// single unsigned zero, and spelled-out infinities.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
