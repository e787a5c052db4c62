//! Handlers that register Cloudinary assets with the search backend.

use async_trait::async_trait;
use serde_json::Value;

use crate::mcp::format::{asset_index_failed_text, asset_indexed_text, bulk_indexed_text};
use crate::mcp::protocol::{JsonObject, ToolResult};
use crate::mcp::registry::{Tool, ToolContext};
use crate::mcp::{TOOL_BULK_INDEX_ASSETS, TOOL_INDEX_ASSET};
use crate::search::{IndexableAsset, SearchDocument};

use super::{non_empty_string, string_list};

/// `index-cloudinary-asset`: index one asset.
pub struct IndexAssetTool;

#[async_trait]
impl Tool for IndexAssetTool {
    type Input = IndexableAsset;

    fn validate(&self, arguments: &JsonObject) -> Result<Self::Input, ToolResult> {
        let fields = (
            non_empty_string(arguments, "public_id"),
            non_empty_string(arguments, "secure_url"),
            non_empty_string(arguments, "resource_type"),
            non_empty_string(arguments, "format"),
        );
        let (Some(public_id), Some(secure_url), Some(resource_type), Some(format)) = fields else {
            return Err(ToolResult::error(
                "public_id, secure_url, resource_type, and format are required",
            ));
        };

        Ok(IndexableAsset {
            public_id,
            secure_url,
            resource_type,
            format,
            tags: string_list(arguments.get("tags")),
        })
    }

    async fn run(&self, ctx: &ToolContext, asset: IndexableAsset) -> ToolResult {
        let document = asset.to_document(TOOL_INDEX_ASSET, &ctx.site_url);
        match ctx
            .search
            .index_document(ctx.credentials.search.as_ref(), &document)
            .await
        {
            Ok(outcome) if outcome.succeeded() => {
                tracing::info!(document_id = %document.id, "Asset indexed");
                ToolResult::text(asset_indexed_text(
                    &asset,
                    &outcome.message_or("Document indexed"),
                ))
            }
            Ok(outcome) => {
                tracing::warn!(
                    document_id = %document.id,
                    code = ?outcome.code,
                    "Search backend rejected asset"
                );
                ToolResult::text(asset_index_failed_text(
                    &asset,
                    &outcome.message_or("Unknown error"),
                ))
            }
            Err(err) => {
                tracing::warn!(document_id = %document.id, error = %err, "Asset indexing failed");
                ToolResult::error(format!("Failed to index asset: {err}"))
            }
        }
    }
}

/// `bulk-index-cloudinary-assets`: index every valid entry with one mutation.
pub struct BulkIndexAssetsTool;

#[async_trait]
impl Tool for BulkIndexAssetsTool {
    type Input = Vec<IndexableAsset>;

    fn validate(&self, arguments: &JsonObject) -> Result<Self::Input, ToolResult> {
        let entries = match arguments.get("assets") {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            _ => {
                return Err(ToolResult::error(
                    "assets array is required and must not be empty",
                ));
            }
        };

        let assets: Vec<_> = entries
            .iter()
            .filter_map(Value::as_object)
            .filter_map(bulk_entry)
            .collect();
        if assets.is_empty() {
            return Err(ToolResult::error(
                "No valid assets to index. Each asset needs public_id and secure_url.",
            ));
        }
        if assets.len() < entries.len() {
            tracing::debug!(
                skipped = entries.len() - assets.len(),
                "Skipping bulk entries without public_id or secure_url"
            );
        }
        Ok(assets)
    }

    async fn run(&self, ctx: &ToolContext, assets: Vec<IndexableAsset>) -> ToolResult {
        let documents: Vec<SearchDocument> = assets
            .iter()
            .map(|asset| asset.to_document(TOOL_BULK_INDEX_ASSETS, &ctx.site_url))
            .collect();

        match ctx
            .search
            .bulk_index(ctx.credentials.search.as_ref(), &documents)
            .await
        {
            Ok(outcome) if outcome.succeeded() => {
                tracing::info!(documents = documents.len(), "Bulk index completed");
                ToolResult::text(bulk_indexed_text(
                    documents.len(),
                    &outcome.message_or("Documents indexed"),
                ))
            }
            Ok(outcome) => ToolResult::error(format!(
                "Bulk indexing failed: {}",
                outcome.message_or("Unknown error")
            )),
            Err(err) => {
                tracing::warn!(documents = documents.len(), error = %err, "Bulk indexing failed");
                ToolResult::error(format!("Bulk indexing failed: {err}"))
            }
        }
    }
}

/// One bulk entry; `None` when `public_id` or `secure_url` is missing.
fn bulk_entry(entry: &JsonObject) -> Option<IndexableAsset> {
    Some(IndexableAsset {
        public_id: non_empty_string(entry, "public_id")?,
        secure_url: non_empty_string(entry, "secure_url")?,
        resource_type: non_empty_string(entry, "resource_type").unwrap_or_else(|| "image".into()),
        format: non_empty_string(entry, "format").unwrap_or_default(),
        tags: string_list(entry.get("tags")),
    })
}
