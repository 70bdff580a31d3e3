//! JSON-RPC 2.0 message types for the MCP protocol.
//!
//! This module defines the message types exchanged over the stdio transport.
//! All messages follow the JSON-RPC 2.0 framing with MCP-specific methods.
//!
//! # Message Types
//!
//! - **Request**: a message carrying an `id`, expecting exactly one response
//! - **Notification**: a message without an `id`; never answered
//! - **Response**: the result envelope for a request
//!
//! # Design constraints
//!
//! The request `id` is opaque: it is never generated or interpreted here,
//! only echoed back by value in the response. The error envelope of JSON-RPC
//! is part of the wire data model but this server never produces one — every
//! handler failure is either soft response text or silence — so no type
//! exists for it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported in the initialize response.
pub const SERVER_NAME: &str = "webapp-mcp";

/// A JSON-RPC request ID, echoed back verbatim.
///
/// Clients may send any JSON value; comparison is deep value equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Value);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A JSON-RPC 2.0 request message.
///
/// Requests expect a response from the server.
#[derive(Debug, Clone)]
pub struct JsonRpcRequest {
    /// Request identifier, echoed in the response.
    pub id: RequestId,
    /// The method to invoke.
    pub method: String,
    /// Optional parameters for the method.
    pub params: Option<Value>,
}

/// A JSON-RPC 2.0 notification message (incoming).
///
/// Notifications do not have an ID and are never answered.
#[derive(Debug, Clone)]
pub struct JsonRpcNotification {
    /// The notification method.
    pub method: String,
    /// Optional parameters for the notification.
    pub params: Option<Value>,
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to.
    pub id: RequestId,

    /// The result of the method call.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result,
        }
    }
}

/// An incoming message that could be either a request or notification.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// A request expecting a response.
    Request(JsonRpcRequest),
    /// A notification (no response expected).
    Notification(JsonRpcNotification),
}

impl IncomingMessage {
    /// Returns the method name of this message.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Request(req) => &req.method,
            Self::Notification(notif) => &notif.method,
        }
    }

    /// Returns the request ID if this is a request.
    #[must_use]
    pub const fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Request(req) => Some(&req.id),
            Self::Notification(_) => None,
        }
    }
}

/// Errors produced when an input line cannot be understood.
///
/// These never reach the wire: the message loop logs them to stderr and
/// stays silent on stdout.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The line is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The line is valid JSON but not an object.
    #[error("message is not a JSON object")]
    NotAnObject,

    /// The `method` field is missing or not a string.
    #[error("missing or non-string method field")]
    InvalidMethod,
}

/// Parses one input line into an incoming message.
///
/// A message with an `id` key (of any non-null value) is a request; anything
/// else is a notification. The `jsonrpc` field is not inspected — this
/// server echoes the fixed version string and never negotiates.
///
/// # Errors
///
/// Returns a [`ParseError`] if the line is not a JSON object with a string
/// `method` field.
pub fn parse_message(json: &str) -> Result<IncomingMessage, ParseError> {
    let value: Value = serde_json::from_str(json)?;

    let obj = value.as_object().ok_or(ParseError::NotAnObject)?;

    let method = obj
        .get("method")
        .and_then(Value::as_str)
        .ok_or(ParseError::InvalidMethod)?
        .to_string();

    let params = obj.get("params").cloned();

    match obj.get("id") {
        Some(id) if !id.is_null() => Ok(IncomingMessage::Request(JsonRpcRequest {
            id: RequestId(id.clone()),
            method,
            params,
        })),
        _ => Ok(IncomingMessage::Notification(JsonRpcNotification {
            method,
            params,
        })),
    }
}
