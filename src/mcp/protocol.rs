//! JSON-RPC envelope and MCP payload types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// JSON object as used for tool arguments and schemas.
pub type JsonObject = Map<String, Value>;

/// JSON-RPC protocol version echoed in every response.
pub const JSONRPC_VERSION: &str = "2.0";
/// MCP protocol revision advertised by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";
/// JSON-RPC error code for an unknown method.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Inbound request after lenient parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// Caller-supplied id; `1` when absent or null.
    pub id: Value,
    /// Method name; empty when absent.
    pub method: String,
    /// Parameters object, when one was supplied.
    pub params: Option<JsonObject>,
}

impl RpcRequest {
    /// Parse a raw request body.
    ///
    /// Bodies that are not a JSON object are treated as an empty object, which routes them to the
    /// unknown-method path.
    pub fn parse(raw: &[u8]) -> Self {
        let envelope = serde_json::from_slice::<Value>(raw)
            .ok()
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();

        let id = match envelope.get("id") {
            Some(Value::Null) | None => json!(1),
            Some(id) => id.clone(),
        };
        let method = envelope
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let params = envelope.get("params").and_then(Value::as_object).cloned();

        Self { id, method, params }
    }
}

/// Error member of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Numeric JSON-RPC error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
}

/// Outbound response envelope. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Echo of the request id.
    pub id: Value,
    /// Success payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// Successful response carrying `result`.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Failed response carrying an error object.
    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// One text block of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    /// Content kind; always `"text"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Rendered text.
    pub text: String,
}

/// Uniform payload returned by every tool, including tool-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Text blocks, in order.
    pub content: Vec<TextContent>,
}

impl ToolResult {
    /// Result with a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".into(),
                text: text.into(),
            }],
        }
    }

    /// Tool-level failure rendered as `Error: <message>`.
    pub fn error(message: impl AsRef<str>) -> Self {
        Self::text(format!("Error: {}", message.as_ref()))
    }

    /// Text of the first block, or an empty string.
    pub fn first_text(&self) -> &str {
        self.content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default()
    }

    /// Whether the result reports a tool-level failure.
    pub fn is_error(&self) -> bool {
        self.first_text().starts_with("Error: ")
    }
}

/// Discovery entry for one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Wire name, including the configured prefix.
    pub name: String,
    /// What the tool does.
    pub description: String,
    /// JSON schema of the accepted arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonObject,
}
