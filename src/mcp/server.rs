//! rmcp adapter exposing the dispatcher over stdio.

use std::{borrow::Cow, sync::Arc};

use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ListToolsResult, ServerCapabilities,
        ServerInfo, Tool,
    },
};

use super::Dispatcher;

/// MCP server that forwards tool discovery and invocation to a [`Dispatcher`].
///
/// No access token is checked on this transport; the process boundary is the trust boundary.
#[derive(Clone)]
pub struct SiteMcpServer {
    dispatcher: Arc<Dispatcher>,
}

impl SiteMcpServer {
    /// Wrap a shared dispatcher.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        self.dispatcher
            .tools()
            .into_iter()
            .map(|descriptor| Tool {
                name: Cow::Owned(descriptor.name),
                title: None,
                description: Some(Cow::Owned(descriptor.description)),
                input_schema: Arc::new(descriptor.input_schema),
                output_schema: None,
                annotations: None,
                icons: None,
            })
            .collect()
    }
}

impl ServerHandler for SiteMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = super::SERVER_NAME.to_string();
        implementation.title = Some("Site MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: implementation,
            instructions: Some(
                "Manage site posts, purge the cache, and index Cloudinary assets for search.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let arguments = request.arguments.unwrap_or_default();
            let result = self.dispatcher.call_tool(&request.name, arguments).await;
            let is_error = result.is_error();
            let content = result
                .content
                .into_iter()
                .map(|block| Content::text(block.text))
                .collect();

            Ok(if is_error {
                CallToolResult::error(content)
            } else {
                CallToolResult::success(content)
            })
        }
    }
}
