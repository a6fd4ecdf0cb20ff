//! MCP stdio server
//!
//! Reads newline-delimited JSON-RPC requests, dispatches them, and writes one
//! response line per request. Requests are handled concurrently, so a long
//! scan does not block `ping` or `tools/list`. Responses may therefore be
//! written out of order; clients match them by `id`.

use super::protocol::{
    InitializeResult, McpError, McpMethod, McpRequest, McpResponse, ServerInfo, Tool,
    ToolCallParams, ToolCallResult, JSONRPC_VERSION, PROTOCOL_VERSION,
};
use crate::tools::{RawParams, ToolGateway};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct McpServer {
    gateway: ToolGateway,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(gateway: ToolGateway) -> Self {
        Self {
            gateway,
            info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Serve on the process's stdin and stdout until stdin closes
    pub async fn serve_stdio(&self) -> Result<()> {
        info!("MCP server listening on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve on an arbitrary line reader and writer
    ///
    /// Returns once the reader hits EOF and every in-flight request has been
    /// answered.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<McpResponse>();
        let writer_task = tokio::spawn(write_responses(writer, rx));

        let mut in_flight = JoinSet::new();
        let mut lines = reader.lines();

        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read MCP request line")?
        {
            if line.trim().is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            in_flight.spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    // Receiver only closes if the writer failed; that error surfaces below
                    let _ = tx.send(response);
                }
            });
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Request handler task failed");
            }
        }
        drop(tx);

        writer_task
            .await
            .context("MCP response writer task panicked")??;

        info!("MCP client closed input, shutting down");
        Ok(())
    }

    /// Handle one raw input line
    ///
    /// Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<McpResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Received malformed JSON");
                return Some(McpResponse::err(
                    Value::Null,
                    McpError::parse_error(format!("Parse error: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<McpRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(McpResponse::err(
                id,
                McpError::invalid_request(format!("Invalid request: {}", e)),
            )),
        }
    }

    /// Dispatch a parsed request
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "Notification received");
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(McpResponse::err(
                id,
                McpError::invalid_request(format!(
                    "Unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        debug!(method = %request.method, "Handling request");
        let outcome = match McpMethod::from(request.method.as_str()) {
            McpMethod::Initialize => self.initialize(),
            McpMethod::Ping => Ok(json!({})),
            McpMethod::ToolsList => Ok(self.tools_list()),
            McpMethod::ToolsCall => self.tools_call(request.params).await,
            McpMethod::Initialized | McpMethod::Other(_) => {
                Err(McpError::method_not_found(request.method.as_str()))
            }
        };

        Some(match outcome {
            Ok(result) => McpResponse::ok(id, result),
            Err(error) => McpResponse::err(id, error),
        })
    }

    fn initialize(&self) -> Result<Value, McpError> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: json!({ "tools": {} }),
            server_info: self.info.clone(),
        };
        serde_json::to_value(result).map_err(|e| McpError::internal_error(e.to_string()))
    }

    fn tools_list(&self) -> Value {
        let tools: Vec<Tool> = self
            .gateway
            .operations()
            .iter()
            .map(|kind| Tool {
                name: kind.name().to_string(),
                description: kind.description().to_string(),
                input_schema: kind.input_schema(),
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn tools_call(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params = params.ok_or_else(|| McpError::invalid_params("Missing params"))?;
        let call: ToolCallParams = serde_json::from_value(params)
            .map_err(|e| McpError::invalid_params(format!("Invalid tools/call params: {}", e)))?;
        let raw = string_arguments(call.arguments)?;

        let result = self.gateway.invoke(&call.name, &raw).await;
        let payload = ToolCallResult::text(result.render(), !result.succeeded);
        serde_json::to_value(payload).map_err(|e| McpError::internal_error(e.to_string()))
    }
}

/// Flatten call arguments into raw string parameters
///
/// The gateway only accepts text; numbers, booleans and nested values are
/// rejected instead of being coerced.
pub(crate) fn string_arguments(arguments: Option<Value>) -> Result<RawParams, McpError> {
    match arguments {
        None | Some(Value::Null) => Ok(RawParams::new()),
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key, s)),
                other => Err(McpError::invalid_params(format!(
                    "Argument '{}' must be a string, got {}",
                    key,
                    json_type(&other)
                ))),
            })
            .collect(),
        Some(other) => Err(McpError::invalid_params(format!(
            "Arguments must be an object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<McpResponse>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let json =
            serde_json::to_string(&response).context("Failed to serialize MCP response to JSON")?;

        writer
            .write_all(json.as_bytes())
            .await
            .context("Failed to write MCP response")?;
        writer
            .write_all(b"\n")
            .await
            .context("Failed to write newline after MCP response")?;
        writer.flush().await.context("Failed to flush MCP output")?;
    }
    writer.shutdown().await.context("Failed to close MCP output")?;
    Ok(())
}
