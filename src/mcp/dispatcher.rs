//! JSON-RPC method routing.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::config::Config;
use crate::content::{ContentBackend, MemoryContentStore};
use crate::credentials::{CredentialSnapshot, CredentialStore};
use crate::search::{SearchClient, SearchError};

use super::handlers::standard_catalog;
use super::protocol::{
    JsonObject, METHOD_NOT_FOUND, PROTOCOL_VERSION, RpcRequest, RpcResponse, ToolDescriptor,
    ToolResult,
};
use super::registry::{ToolCatalog, ToolContext};

/// Routes `initialize`, `tools/list`, and `tools/call` to the tool catalog.
///
/// Protocol errors are reserved for unknown methods. An unknown tool name yields plain
/// `Unknown tool: <name>` text, and failures inside a tool are reported as a successful response
/// carrying `Error: ...` text.
pub struct Dispatcher {
    catalog: ToolCatalog,
    content: Arc<dyn ContentBackend>,
    search: Arc<SearchClient>,
    credentials: Arc<CredentialStore>,
    site_url: String,
}

impl Dispatcher {
    /// Assemble a dispatcher from its collaborators.
    pub fn new(
        catalog: ToolCatalog,
        content: Arc<dyn ContentBackend>,
        search: Arc<SearchClient>,
        credentials: Arc<CredentialStore>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            content,
            search,
            credentials,
            site_url: site_url.into(),
        }
    }

    /// Standard wiring: in-memory content store, HTTP search client, prefixed catalog.
    pub fn from_config(
        config: &Config,
        credentials: Arc<CredentialStore>,
    ) -> Result<Self, SearchError> {
        let content: Arc<dyn ContentBackend> = Arc::new(MemoryContentStore::new(&config.site));
        let search = Arc::new(SearchClient::new()?);
        Ok(Self::new(
            standard_catalog(&config.tool_prefix),
            content,
            search,
            credentials,
            config.site.url.clone(),
        ))
    }

    /// Handle a raw request body using the current credentials.
    pub async fn dispatch(&self, raw: &[u8]) -> RpcResponse {
        self.dispatch_with(self.credentials.snapshot(), raw).await
    }

    /// Handle a raw request body with credentials already captured for this request.
    pub async fn dispatch_with(
        &self,
        credentials: Arc<CredentialSnapshot>,
        raw: &[u8],
    ) -> RpcResponse {
        self.handle(credentials, RpcRequest::parse(raw)).await
    }

    /// Handle a parsed request.
    pub async fn handle(
        &self,
        credentials: Arc<CredentialSnapshot>,
        request: RpcRequest,
    ) -> RpcResponse {
        let RpcRequest { id, method, params } = request;
        tracing::debug!(method = %method, "Dispatching MCP request");

        match method.as_str() {
            "initialize" => RpcResponse::success(id, self.initialize_result()),
            "tools/list" => RpcResponse::success(id, json!({ "tools": self.tools() })),
            "tools/call" => {
                let params = params.unwrap_or_default();
                let name = params.get("name").and_then(Value::as_str).unwrap_or_default();
                let arguments = params
                    .get("arguments")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                let result = self.call_tool_with(credentials, name, arguments).await;
                match serde_json::to_value(&result) {
                    Ok(value) => RpcResponse::success(id, value),
                    Err(err) => RpcResponse::success(
                        id,
                        json!({ "content": [{ "type": "text", "text": format!("Error: {err}") }] }),
                    ),
                }
            }
            other => {
                tracing::debug!(method = %other, "Unknown MCP method");
                RpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}"))
            }
        }
    }

    /// Descriptors in declaration order.
    pub fn tools(&self) -> Vec<ToolDescriptor> {
        self.catalog.descriptors().cloned().collect()
    }

    /// Invoke a tool by wire name using the current credentials.
    pub async fn call_tool(&self, name: &str, arguments: JsonObject) -> ToolResult {
        self.call_tool_with(self.credentials.snapshot(), name, arguments)
            .await
    }

    /// Invoke a tool by wire name with captured credentials.
    pub async fn call_tool_with(
        &self,
        credentials: Arc<CredentialSnapshot>,
        name: &str,
        arguments: JsonObject,
    ) -> ToolResult {
        let Some(handler) = self.catalog.handler(name) else {
            tracing::warn!(tool = name, "Unknown tool requested");
            return ToolResult::text(format!("Unknown tool: {name}"));
        };

        let ctx = ToolContext {
            content: self.content.clone(),
            search: self.search.clone(),
            credentials,
            site_url: self.site_url.clone(),
        };
        let result = handler.call(&ctx, arguments).await;
        tracing::info!(tool = name, is_error = result.is_error(), "Tool call completed");
        result
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": super::SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::AccessCredential;

    fn dispatcher() -> Dispatcher {
        let credentials = Arc::new(CredentialStore::new(AccessCredential::new("token"), None));
        Dispatcher::from_config(&Config::default(), credentials).expect("dispatcher")
    }

    async fn call(dispatcher: &Dispatcher, body: Value) -> Value {
        let raw = serde_json::to_vec(&body).expect("body");
        serde_json::to_value(dispatcher.dispatch(&raw).await).expect("response")
    }

    #[tokio::test]
    async fn unknown_method_is_a_protocol_error() {
        let response = call(
            &dispatcher(),
            json!({ "jsonrpc": "2.0", "id": 3, "method": "ping" }),
        )
        .await;
        assert_eq!(
            response,
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "error": { "code": -32601, "message": "Method not found: ping" }
            })
        );
    }

    #[tokio::test]
    async fn unknown_tool_reports_plain_text() {
        let response = call(
            &dispatcher(),
            json!({ "id": 4, "method": "tools/call", "params": { "name": "nonexistent-tool" } }),
        )
        .await;
        assert!(response.get("error").is_none());
        assert_eq!(response["id"], 4);
        assert_eq!(
            response["result"],
            json!({ "content": [{ "type": "text", "text": "Unknown tool: nonexistent-tool" }] })
        );
    }

    #[tokio::test]
    async fn initialize_ignores_params() {
        let dispatcher = dispatcher();
        let bare = call(&dispatcher, json!({ "id": 1, "method": "initialize" })).await;
        let with_params = call(
            &dispatcher,
            json!({ "id": 1, "method": "initialize", "params": { "clientInfo": { "name": "x" } } }),
        )
        .await;

        assert_eq!(bare, with_params);
        assert_eq!(bare["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(bare["result"]["capabilities"], json!({ "tools": {} }));
        assert_eq!(bare["result"]["serverInfo"]["name"], "site-mcp");
    }

    #[tokio::test]
    async fn tools_list_is_complete_and_stable() {
        let dispatcher = dispatcher();
        let first = dispatcher.dispatch(br#"{"id":1,"method":"tools/list"}"#).await;
        let second = dispatcher.dispatch(br#"{"id":1,"method":"tools/list"}"#).await;
        assert_eq!(
            serde_json::to_vec(&first).expect("json"),
            serde_json::to_vec(&second).expect("json")
        );

        let value = serde_json::to_value(first).expect("json");
        let tools = value["result"]["tools"].as_array().expect("tools");
        let expected = [
            ("wpengine--get-current-site-info", None),
            ("wpengine--purge-cache", None),
            ("wpengine--create-post", Some(json!(["title", "content"]))),
            ("wpengine--update-post", Some(json!(["post_id"]))),
            ("wpengine--get-post", Some(json!(["post_id"]))),
            ("wpengine--list-posts", None),
            (
                "wpengine--index-cloudinary-asset",
                Some(json!(["public_id", "secure_url", "resource_type", "format"])),
            ),
            ("wpengine--bulk-index-cloudinary-assets", Some(json!(["assets"]))),
        ];
        assert_eq!(tools.len(), expected.len());
        for (tool, (name, required)) in tools.iter().zip(expected) {
            assert_eq!(tool["name"], name);
            assert_eq!(tool["inputSchema"]["type"], "object", "{name}");
            assert_eq!(tool["inputSchema"].get("required").cloned(), required, "{name}");
        }
    }

    #[tokio::test]
    async fn missing_id_defaults_to_one() {
        let response = call(&dispatcher(), json!({ "method": "tools/list" })).await;
        assert_eq!(response["id"], 1);
    }

    #[tokio::test]
    async fn non_object_arguments_are_treated_as_empty() {
        let response = call(
            &dispatcher(),
            json!({
                "id": 9,
                "method": "tools/call",
                "params": { "name": "wpengine--create-post", "arguments": "title" }
            }),
        )
        .await;
        assert_eq!(
            response["result"]["content"][0]["text"],
            "Error: title and content are required"
        );
    }

    #[tokio::test]
    async fn calls_reach_the_shared_content_store() {
        let dispatcher = dispatcher();
        let created = dispatcher
            .call_tool(
                "wpengine--create-post",
                json!({ "title": "Hello", "content": "World" })
                    .as_object()
                    .cloned()
                    .expect("object"),
            )
            .await;
        assert!(created.first_text().contains("ID: 1"));

        let fetched = dispatcher
            .call_tool(
                "wpengine--get-post",
                json!({ "post_id": 1 }).as_object().cloned().expect("object"),
            )
            .await;
        assert!(fetched.first_text().contains("Title: Hello"));
    }
}
