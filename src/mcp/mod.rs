//! Model Context Protocol (MCP) tool dispatch for the site.
//!
//! A single [`Dispatcher`] owns the tool catalog and routes JSON-RPC requests to it. The HTTP
//! endpoint and the stdio adapter both go through it, so tool behavior is identical across
//! transports.
//!
//! - Methods: `initialize`, `tools/list`, `tools/call`.
//! - Tools: site info, cache purge, post create/update/get/list, and Cloudinary asset indexing.

mod dispatcher;
mod format;
pub mod handlers;
pub mod protocol;
pub mod registry;
mod schemas;
mod server;

pub use dispatcher::Dispatcher;
pub use protocol::{RpcRequest, RpcResponse, ToolDescriptor, ToolResult};
pub use registry::{Tool, ToolCatalog, ToolContext, ToolHandler};
pub use server::SiteMcpServer;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "site-mcp";

pub(crate) const TOOL_SITE_INFO: &str = "get-current-site-info";
pub(crate) const TOOL_PURGE_CACHE: &str = "purge-cache";
pub(crate) const TOOL_CREATE_POST: &str = "create-post";
pub(crate) const TOOL_UPDATE_POST: &str = "update-post";
pub(crate) const TOOL_GET_POST: &str = "get-post";
pub(crate) const TOOL_LIST_POSTS: &str = "list-posts";
pub(crate) const TOOL_INDEX_ASSET: &str = "index-cloudinary-asset";
pub(crate) const TOOL_BULK_INDEX_ASSETS: &str = "bulk-index-cloudinary-assets";
