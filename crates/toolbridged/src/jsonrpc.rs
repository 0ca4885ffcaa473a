//! JSON-RPC 2.0 message types for the server side of LSP.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Invalid JSON was received.
pub const PARSE_ERROR: i64 = -32700;
/// The message is not a valid request in the current state.
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Parameters could not be decoded or name something invalid.
pub const INVALID_PARAMS: i64 = -32602;
/// The server failed to build a response.
pub const INTERNAL_ERROR: i64 = -32603;
/// The request was valid but failed while being handled.
pub const REQUEST_FAILED: i64 = -32803;

/// Any message received from the client.
///
/// Requests carry both `id` and `method`, notifications only `method`, and
/// responses to server-initiated requests only `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    /// Request identifier, a number or a string.
    #[serde(default)]
    pub id: Option<Value>,
    /// The method to invoke.
    #[serde(default)]
    pub method: Option<String>,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
}

impl JsonRpcError {
    /// Builds an error object.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A JSON-RPC 2.0 response message.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Identifier of the request being answered, `null` when unknown.
    pub id: Value,
    /// The result on success; serialised as `null` for empty results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// The error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Successful response carrying `result`.
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response.
    #[must_use]
    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}
