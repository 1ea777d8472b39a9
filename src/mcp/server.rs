//! MCP server implementation
//!
//! Implements the Model Context Protocol server that exposes the math
//! tools via stdio. Requests are handled one at a time, in arrival order.

use crate::config::ServerConfig;
use crate::mcp::protocol::*;
use crate::mcp::tools::ToolRegistry;
use crate::types::ToolError;
use anyhow::Result;
use bytes::BytesMut;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};
use tracing::debug;

/// Longest request line accepted before it is discarded
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024 * 1024;

const READ_BUFFER_CAPACITY: usize = 8 * 1024;

pub struct McpServer {
    registry: ToolRegistry,
    server_name: String,
    max_line_length: usize,
}

impl McpServer {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            registry: ToolRegistry::new(),
            server_name: config.server_name().to_string(),
            max_line_length: config
                .server
                .max_line_length
                .unwrap_or(DEFAULT_MAX_LINE_LENGTH),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run the MCP server on stdin/stdout until the client disconnects
    pub async fn run(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC over an arbitrary stream pair
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut codec = LinesCodec::new_with_max_length(self.max_line_length);
        let mut buf = BytesMut::with_capacity(READ_BUFFER_CAPACITY);
        let mut eof = false;

        loop {
            let decoded = if eof {
                codec.decode_eof(&mut buf)
            } else {
                codec.decode(&mut buf)
            };

            let response = match decoded {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    debug!("Received request: {}", line);
                    self.handle_message(line)
                }
                Ok(None) if eof => break,
                Ok(None) => {
                    if reader.read_buf(&mut buf).await? == 0 {
                        eof = true;
                    }
                    continue;
                }
                // The codec skips the rest of the line on its own; keep serving.
                Err(LinesCodecError::MaxLineLengthExceeded) => Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(
                        INVALID_REQUEST,
                        format!(
                            "Request exceeds maximum line length of {} bytes",
                            self.max_line_length
                        ),
                    ),
                )),
                Err(LinesCodecError::Io(e)) => Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                )),
            };

            let Some(response) = response else {
                continue;
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;

            debug!("Sent response");
        }

        debug!("Client closed connection");
        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub fn handle_message(&self, content: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e)),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::new(
                    INVALID_REQUEST,
                    format!("Unsupported jsonrpc version: {}", request.jsonrpc),
                ),
            ));
        }

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        Some(self.handle_request(request))
    }

    fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(Value::Null);

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_call_tool(request.params),
            _ => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        };

        match result {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        }
    }

    fn handle_initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = match params {
            Some(params) => serde_json::from_value(params).map_err(|e| {
                JsonRpcError::new(INVALID_PARAMS, format!("Invalid initialize params: {}", e))
            })?,
            None => InitializeParams::default(),
        };

        if let Some(client) = &params.client_info {
            debug!(
                "Client connected: {} {}",
                client.name,
                client.version.as_deref().unwrap_or("")
            );
        }
        if let Some(version) = &params.protocol_version {
            if version != PROTOCOL_VERSION {
                debug!("Client requested protocol {}, offering {}", version, PROTOCOL_VERSION);
            }
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: serde_json::json!({}),
            },
            server_info: ServerInfo {
                name: self.server_name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_result(result)
    }

    fn handle_list_tools(&self) -> Result<Value, JsonRpcError> {
        to_result(ListToolsResult {
            tools: self.registry.list_tools().to_vec(),
        })
    }

    fn handle_call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| {
                JsonRpcError::new(INVALID_PARAMS, format!("Invalid tool call params: {}", e))
            })?;

        debug!("Calling tool: {}", params.name);

        match self.registry.call_tool(&params.name, params.arguments.as_ref()) {
            Ok(result) => to_result(result),
            Err(e) => {
                debug!("Tool call failed: {}", e);
                Err(tool_error(e))
            }
        }
    }
}

fn tool_error(error: ToolError) -> JsonRpcError {
    let data = match &error {
        ToolError::UnknownTool(name) => serde_json::json!({ "tool": name }),
        ToolError::InvalidArguments { tool, .. } => serde_json::json!({ "tool": tool }),
    };

    JsonRpcError {
        code: INVALID_PARAMS,
        message: error.to_string(),
        data: Some(data),
    }
}

fn to_result<T: serde::Serialize>(value: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| {
        JsonRpcError::new(INTERNAL_ERROR, format!("Failed to serialize result: {}", e))
    })
}
