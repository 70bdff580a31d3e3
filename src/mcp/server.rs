//! MCP server implementation for web application introspection.
//!
//! This module owns the request dispatcher, the fixed resource and tool
//! registries, and the message loop:
//!
//! 1. **Read**: one line from stdin
//! 2. **Parse**: one JSON-RPC message per line
//! 3. **Dispatch**: flat method lookup, no lifecycle state
//! 4. **Respond**: one flushed JSON line, or silence
//!
//! # Error policy
//!
//! Resource and tool failures are soft: the handler absorbs them into the
//! response payload text and the protocol sees a normal result. Unparseable
//! lines and missing tool arguments are hard failures: logged to stderr,
//! never answered, never fatal to the loop.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::DispatchError;
use crate::mcp::protocol::{
    parse_message, IncomingMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::transport::StdioTransport;
use crate::project::fs;
use crate::project::guard::PathGuard;
use crate::project::routes::{self, RoutesProvider, ROUTES_UNAVAILABLE};
use crate::project::schema::SchemaProvider;

/// URI of the database schema resource.
pub const SCHEMA_URI: &str = "app://schema";

/// URI of the route table resource.
pub const ROUTES_URI: &str = "app://routes";

/// Soft-error text for a uri the registry does not know.
pub const UNKNOWN_RESOURCE: &str = "unknown resource";

/// Soft-error text for a tool name the registry does not know.
pub const UNKNOWN_TOOL: &str = "unknown tool";

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    /// Resource-related capabilities.
    pub resources: ResourceCapabilities,
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Resource-specific capabilities (none beyond presence).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceCapabilities {}

/// Tool-specific capabilities (none beyond presence).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {}

/// Server information for the initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// A resource definition for the resources/list response.
///
/// Descriptors are static: the same two entries are returned on every call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Stable, scheme-qualified identifier.
    pub uri: &'static str,
    /// Human-readable label.
    pub name: &'static str,
    /// Advertised content type.
    pub mime_type: &'static str,
}

/// A tool definition for the tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call: a single text block.
///
/// Soft errors travel in the text like any other payload, so there is no
/// error flag here.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }
}

/// The MCP server for web application introspection.
pub struct McpServer {
    /// The transport layer.
    transport: StdioTransport,
    /// Path sandbox for the filesystem tools.
    guard: PathGuard,
    /// Schema resource content source.
    schema: Box<dyn SchemaProvider>,
    /// Routes resource content source.
    routes: Box<dyn RoutesProvider>,
}

impl McpServer {
    /// Creates a new MCP server over the given project root and providers.
    #[must_use]
    pub fn new(
        guard: PathGuard,
        schema: Box<dyn SchemaProvider>,
        routes: Box<dyn RoutesProvider>,
    ) -> Self {
        Self {
            transport: StdioTransport::new(),
            guard,
            schema,
            routes,
        }
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// The loop ends when stdin reaches end-of-stream or a termination
    /// signal arrives between lines.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, shutting down");
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, shutting down");
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down (stdin closed).
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool> {
        let Some(line) = line_result? else {
            tracing::info!("stdin closed, shutting down");
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        self.handle_line(&line).await?;

        Ok(false)
    }

    /// Handles a single non-empty line of input.
    ///
    /// Parse failures and dispatch failures are logged to stderr and produce
    /// no stdout line; the wire only ever sees well-formed replies or
    /// silence.
    async fn handle_line(&mut self, line: &str) -> std::io::Result<()> {
        let msg = match parse_message(line) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unparseable input line");
                return Ok(());
            }
        };

        match self.dispatch(msg) {
            Ok(Some(response)) => self.transport.write_response(&response).await,
            Ok(None) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "Request handler failed");
                Ok(())
            }
        }
    }

    /// Dispatches one parsed message, returning the response to write, if
    /// any.
    ///
    /// This is the whole per-request state machine: notifications and
    /// unknown methods produce `None`, everything else produces exactly one
    /// response. Requests do not interact — there is no session state.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] for the hard-failure tier (currently only
    /// a missing tool argument); the caller logs it and stays silent.
    pub fn dispatch(
        &self,
        msg: IncomingMessage,
    ) -> Result<Option<JsonRpcResponse>, DispatchError> {
        match msg {
            IncomingMessage::Request(req) => self.handle_request(&req),
            IncomingMessage::Notification(notif) => {
                Self::handle_notification(&notif);
                Ok(None)
            }
        }
    }

    /// Handles an incoming request via the method dispatch table.
    fn handle_request(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, DispatchError> {
        let response = match req.method.as_str() {
            "initialize" => Some(Self::handle_initialize(req)),
            "resources/list" => Some(Self::handle_resources_list(req)),
            "resources/read" => Some(self.handle_resources_read(req)),
            "tools/list" => Some(Self::handle_tools_list(req)),
            "tools/call" => Some(self.handle_tools_call(req)?),
            "ping" => Some(Self::handle_ping(req)),
            _ => {
                // Unknown methods are dropped, not answered
                tracing::debug!(method = %req.method, "Ignoring unknown method");
                None
            }
        };

        Ok(response)
    }

    /// Handles an incoming notification.
    fn handle_notification(notif: &JsonRpcNotification) {
        tracing::debug!(method = %notif.method, "Notification received");
    }

    /// Handles the initialize request.
    ///
    /// Initialisation is stateless: params are not validated and the
    /// response is the same fixed version, capabilities and identity every
    /// time.
    fn handle_initialize(req: &JsonRpcRequest) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        JsonRpcResponse::success(req.id.clone(), result)
    }

    /// Handles the resources/list request.
    fn handle_resources_list(req: &JsonRpcRequest) -> JsonRpcResponse {
        let result = json!({
            "resources": Self::get_resource_descriptors(),
        });

        JsonRpcResponse::success(req.id.clone(), result)
    }

    /// Handles the resources/read request.
    ///
    /// The client's uri is echoed back verbatim in the content object (or
    /// `null` when it was absent); an unknown or missing uri is a soft
    /// error.
    fn handle_resources_read(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        let uri = req
            .params
            .as_ref()
            .and_then(|p| p.get("uri"))
            .and_then(Value::as_str);

        let text = self.read_resource(uri);

        let result = json!({
            "contents": [{
                "uri": uri,
                "mimeType": "text/plain",
                "text": text,
            }],
        });

        JsonRpcResponse::success(req.id.clone(), result)
    }

    /// Produces the content text for a resource uri.
    fn read_resource(&self, uri: Option<&str>) -> String {
        let Some(uri) = uri else {
            return UNKNOWN_RESOURCE.to_string();
        };

        let (base, query) = match uri.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (uri, None),
        };

        match base {
            SCHEMA_URI => self.schema.read(),
            ROUTES_URI => {
                let Some(entries) = self.routes.routes() else {
                    return ROUTES_UNAVAILABLE.to_string();
                };

                let formatted = routes::format_routes(&entries);
                match query.and_then(|q| q.strip_prefix("q=")) {
                    Some(term) => routes::filter_routes(&formatted, term),
                    None => formatted,
                }
            }
            _ => UNKNOWN_RESOURCE.to_string(),
        }
    }

    /// Handles the tools/list request.
    fn handle_tools_list(req: &JsonRpcRequest) -> JsonRpcResponse {
        let result = json!({
            "tools": Self::get_tool_definitions(),
        });

        JsonRpcResponse::success(req.id.clone(), result)
    }

    /// Handles the tools/call request.
    ///
    /// An unknown or missing tool name is a soft error. A known tool called
    /// without its `path` argument — including the common misuse of putting
    /// `path` at the params top level instead of under `arguments` — is a
    /// missing-argument hard failure.
    fn handle_tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, DispatchError> {
        let params = req.params.as_ref();
        let name = params.and_then(|p| p.get("name")).and_then(Value::as_str);
        let arguments = params.and_then(|p| p.get("arguments"));

        let text = match name {
            Some("ls") => fs::list_directory(&self.guard, require_path(arguments)?),
            Some("read_file") => fs::read_file(&self.guard, require_path(arguments)?),
            _ => UNKNOWN_TOOL.to_string(),
        };

        let result = serde_json::to_value(ToolCallResult::text(text))
            .unwrap_or_else(|_| json!({"content": []}));

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the ping request.
    fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }

    /// Returns the fixed resource descriptors.
    fn get_resource_descriptors() -> Vec<ResourceDescriptor> {
        vec![
            ResourceDescriptor {
                uri: SCHEMA_URI,
                name: "Database Schema",
                mime_type: "application/sql",
            },
            ResourceDescriptor {
                uri: ROUTES_URI,
                name: "Application Routes",
                mime_type: "text/plain",
            },
        ]
    }

    /// Returns the fixed tool definitions.
    fn get_tool_definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "ls",
                description: "List files and directories inside the project. \
                              Directory entries carry a trailing slash.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "Relative path inside the project (e.g. app/models)"
                        }
                    },
                    "required": ["path"]
                }),
            },
            ToolDefinition {
                name: "read_file",
                description: "Read the contents of a source file inside the project.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "File path inside the project (e.g. db/schema.sql)"
                        }
                    },
                    "required": ["path"]
                }),
            },
        ]
    }
}

/// Extracts the required `path` string argument of a filesystem tool.
fn require_path(arguments: Option<&Value>) -> Result<&str, DispatchError> {
    arguments
        .and_then(|a| a.get("path"))
        .and_then(Value::as_str)
        .ok_or(DispatchError::MissingArgument { name: "path" })
}
