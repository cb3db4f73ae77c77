//! MCP server implementation.
//!
//! Requests are read line by line. `tools/call` requests run as their own
//! tasks so several registry lookups can be in flight at once; every other
//! method is answered inline. All responses go out through the one transport
//! writer owned by the serve loop.

use crate::adapter::DataMeshTools;
use crate::error::McpError;
use crate::prompts::{builtin_prompts, StaticPrompt};
use crate::protocol::*;
use crate::tools::ToolRegistry;
use crate::transport::StdioTransport;
use dmm_client::RegistryConnector;
use dmm_core::ServerConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::{AbortHandle, JoinError, JoinSet};

/// Key identifying an in-flight request: the JSON encoding of its id.
type RequestKey = String;

fn request_key(id: &Value) -> RequestKey {
    id.to_string()
}

/// The MCP server.
pub struct McpServer {
    config: Arc<ServerConfig>,
    tools: ToolRegistry,
    prompts: Vec<StaticPrompt>,
    adapter: DataMeshTools,
}

/// What a spawned call task yields: its key, spawn sequence and response.
type Finished = (RequestKey, u64, JsonRpcResponse);

/// A spawned call still awaiting its response.
struct Pending {
    seq: u64,
    id: Option<Value>,
    handle: AbortHandle,
}

/// Bookkeeping for spawned `tools/call` tasks.
struct InFlight {
    tasks: JoinSet<Finished>,
    handles: HashMap<RequestKey, Pending>,
    next_seq: u64,
}

impl InFlight {
    fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            handles: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Run `call` for request `id`. A call already running under the same id
    /// is aborted and its response, if it still arrives, is discarded.
    fn spawn<F>(&mut self, id: Value, call: F)
    where
        F: Future<Output = JsonRpcResponse> + Send + 'static,
    {
        let key = request_key(&id);
        let seq = self.next_seq;
        self.next_seq += 1;

        let task_key = key.clone();
        let handle = self.tasks.spawn(async move { (task_key, seq, call.await) });
        let pending = Pending {
            seq,
            id: Some(id),
            handle,
        };
        if let Some(previous) = self.handles.insert(key, pending) {
            tracing::warn!("Duplicate request id, dropping the earlier call");
            previous.handle.abort();
        }
    }

    fn cancel(&mut self, key: &str) -> bool {
        match self.handles.remove(key) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Response to write for a finished task, if its request is still wanted.
    fn finish(&mut self, joined: Result<Finished, JoinError>) -> Option<JsonRpcResponse> {
        match joined {
            Ok((key, seq, response)) => {
                if self.handles.get(&key)?.seq != seq {
                    tracing::debug!(request_key = %key, "Discarding response of a superseded call");
                    return None;
                }
                self.handles.remove(&key);
                Some(response)
            }
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                let task_id = e.id();
                let key = self
                    .handles
                    .iter()
                    .find(|(_, pending)| pending.handle.id() == task_id)
                    .map(|(key, _)| key.clone())?;
                let id = self.handles.remove(&key)?.id;
                tracing::error!(error = %e, "Tool call task failed");
                Some(JsonRpcResponse::error(
                    id,
                    error_codes::INTERNAL_ERROR,
                    "Tool call failed unexpectedly",
                ))
            }
        }
    }
}

impl McpServer {
    /// Create a server exposing the data mesh tools over `connector`.
    pub fn new(config: Arc<ServerConfig>, connector: Arc<dyn RegistryConnector>) -> Self {
        let tools = ToolRegistry::with_data_mesh_tools();
        tracing::info!(
            server_name = %config.mcp.server_name,
            tool_count = tools.len(),
            "Registered tools"
        );
        Self {
            config,
            tools,
            prompts: builtin_prompts(),
            adapter: DataMeshTools::new(connector),
        }
    }

    /// Get a reference to the tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get a reference to the tool operations.
    pub fn adapter(&self) -> &DataMeshTools {
        &self.adapter
    }

    /// Registered prompts.
    pub fn prompts(&self) -> &[StaticPrompt] {
        &self.prompts
    }

    /// Run the server on the process's stdin and stdout.
    pub async fn run_stdio(self: Arc<Self>) -> Result<(), McpError> {
        tracing::info!("Starting MCP server with stdio transport");
        self.serve(StdioTransport::stdio()).await
    }

    /// Serve until the input is closed and every in-flight call has finished.
    pub async fn serve<R, W>(self: Arc<Self>, mut transport: StdioTransport<R, W>) -> Result<(), McpError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut in_flight = InFlight::new();
        let mut reading = true;

        loop {
            tokio::select! {
                line = transport.read_line(), if reading => match line? {
                    None => {
                        tracing::info!(in_flight = in_flight.handles.len(), "stdin closed, shutting down");
                        reading = false;
                    }
                    Some(line) if line.is_empty() => {}
                    Some(line) => {
                        if let Some(response) = self.on_message(&line, &mut in_flight).await {
                            transport.write_response(&response).await?;
                        }
                    }
                },
                Some(joined) = in_flight.tasks.join_next(), if !in_flight.tasks.is_empty() => {
                    if let Some(response) = in_flight.finish(joined) {
                        transport.write_response(&response).await?;
                    }
                }
                else => break,
            }

            if !reading && in_flight.tasks.is_empty() {
                break;
            }
        }

        tracing::info!("MCP server stopped");
        Ok(())
    }

    /// Handle one input line. Returns a response to write now, if any.
    async fn on_message(self: &Arc<Self>, line: &str, in_flight: &mut InFlight) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON-RPC message");
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        // An explicit `"id": null` still expects a response.
        let raw_id = message.get("id").cloned();
        let mut request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed JSON-RPC request");
                return Some(JsonRpcResponse::error(
                    raw_id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };
        if request.id.is_none() {
            request.id = raw_id;
        }

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request, in_flight);
            return None;
        };

        tracing::debug!(method = %request.method, id = %id, "Received request");

        if request.method == "tools/call" {
            let server = Arc::clone(self);
            in_flight.spawn(id, async move { server.handle_request(request).await });
            return None;
        }

        Some(self.handle_request(request).await)
    }

    fn handle_notification(&self, notification: &JsonRpcRequest, in_flight: &mut InFlight) {
        match notification.method.as_str() {
            "notifications/cancelled" => {
                let params = notification
                    .params
                    .clone()
                    .map(serde_json::from_value::<CancelledParams>);
                match params {
                    Some(Ok(params)) => {
                        let cancelled = in_flight.cancel(&request_key(&params.request_id));
                        tracing::info!(
                            request_id = %params.request_id,
                            reason = ?params.reason,
                            cancelled,
                            "Cancellation requested"
                        );
                    }
                    _ => tracing::warn!("Ignoring malformed cancellation notification"),
                }
            }
            "notifications/initialized" => tracing::debug!("Client initialized"),
            other => tracing::debug!(method = %other, "Ignoring notification"),
        }
    }

    /// Handle a JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "prompts/list" => self.handle_list_prompts(id),
            "prompts/get" => self.handle_get_prompt(id, request.params),
            "shutdown" => self.handle_shutdown(id),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let mut result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": self.config.mcp.server_name,
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                },
                "prompts": {
                    "listChanged": false
                }
            }
        });
        if let Some(instructions) = &self.config.mcp.instructions {
            result["instructions"] = json!(instructions);
        }
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResponse {
            tools: self.tools.list().to_vec(),
        };
        to_response(id, &result)
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    )
                }
            },
            None => return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing params"),
        };

        if !self.tools.contains(&params.name) {
            let err = McpError::ToolNotFound { name: params.name };
            return JsonRpcResponse::error(id, err.code(), err.to_string());
        }

        match self.adapter.call(&params.name, params.arguments).await {
            Ok(result) => to_response(id, &result),
            Err(err) => JsonRpcResponse::error(id, err.code(), err.to_string()),
        }
    }

    fn handle_list_prompts(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListPromptsResponse {
            prompts: self.prompts.iter().map(StaticPrompt::definition).collect(),
        };
        to_response(id, &result)
    }

    fn handle_get_prompt(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: GetPromptParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                )
            }
            None => return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing params"),
        };

        let Some(prompt) = self.prompts.iter().find(|p| p.name == params.name) else {
            let err = McpError::PromptNotFound { name: params.name };
            return JsonRpcResponse::error(id, err.code(), err.to_string());
        };

        let result = GetPromptResponse {
            description: Some(prompt.description.to_string()),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: ToolContent::text(prompt.text),
            }],
        };
        to_response(id, &result)
    }

    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        tracing::info!("MCP server shutdown requested");
        JsonRpcResponse::success(id, json!(null))
    }
}

fn to_response<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize result");
            JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string())
        }
    }
}
