//! Handlers for site information and cache tools.

use async_trait::async_trait;

use crate::mcp::format::site_info_text;
use crate::mcp::protocol::{JsonObject, ToolResult};
use crate::mcp::registry::{Tool, ToolContext};

/// `get-current-site-info`: describe the site.
pub struct SiteInfoTool;

#[async_trait]
impl Tool for SiteInfoTool {
    type Input = ();

    fn validate(&self, _arguments: &JsonObject) -> Result<Self::Input, ToolResult> {
        Ok(())
    }

    async fn run(&self, ctx: &ToolContext, _input: ()) -> ToolResult {
        match ctx.content.site_info().await {
            Ok(site) => ToolResult::text(site_info_text(&site)),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load site information");
                ToolResult::error(format!("Failed to load site information: {err}"))
            }
        }
    }
}

/// `purge-cache`: best-effort cache flush that always reports success.
pub struct PurgeCacheTool;

#[async_trait]
impl Tool for PurgeCacheTool {
    type Input = ();

    fn validate(&self, _arguments: &JsonObject) -> Result<Self::Input, ToolResult> {
        Ok(())
    }

    async fn run(&self, ctx: &ToolContext, _input: ()) -> ToolResult {
        match ctx.content.flush_cache().await {
            Ok(true) => tracing::info!("Site cache flushed"),
            Ok(false) => tracing::debug!("No cache layer to flush"),
            Err(err) => tracing::warn!(error = %err, "Cache flush failed"),
        }

        let site_name = match ctx.content.site_info().await {
            Ok(site) => site.name,
            Err(_) => ctx.site_url.clone(),
        };
        ToolResult::text(format!("Cache purged successfully for site: {site_name}"))
    }
}
