//! Tool handlers for the MCP catalog.

use serde_json::Value;

use super::protocol::{JsonObject, ToolDescriptor};
use super::registry::ToolCatalog;
use super::schemas;
use super::{
    TOOL_BULK_INDEX_ASSETS, TOOL_CREATE_POST, TOOL_GET_POST, TOOL_INDEX_ASSET, TOOL_LIST_POSTS,
    TOOL_PURGE_CACHE, TOOL_SITE_INFO, TOOL_UPDATE_POST,
};

pub mod assets;
pub mod posts;
pub mod site;

/// Build the full catalog in declaration order, prefixing every name with `prefix`.
pub fn standard_catalog(prefix: &str) -> ToolCatalog {
    let describe = |name: &str, description: &str, input_schema| ToolDescriptor {
        name: format!("{prefix}{name}"),
        description: description.to_string(),
        input_schema,
    };

    let mut catalog = ToolCatalog::new();
    catalog.register(
        describe(
            TOOL_SITE_INFO,
            "Get information about the current site: name, URL, description, platform version, and admin contact.",
            schemas::empty_object_schema(),
        ),
        site::SiteInfoTool,
    );
    catalog.register(
        describe(
            TOOL_PURGE_CACHE,
            "Purge the site's cache so visitors see the latest content.",
            schemas::empty_object_schema(),
        ),
        site::PurgeCacheTool,
    );
    catalog.register(
        describe(
            TOOL_CREATE_POST,
            "Create a new post. Optionally embed a Cloudinary image at the top of the content.",
            schemas::create_post_input_schema(),
        ),
        posts::CreatePostTool,
    );
    catalog.register(
        describe(
            TOOL_UPDATE_POST,
            "Update the title, content, or status of an existing post.",
            schemas::update_post_input_schema(),
        ),
        posts::UpdatePostTool,
    );
    catalog.register(
        describe(
            TOOL_GET_POST,
            "Get a post by ID, including Cloudinary metadata and a content excerpt.",
            schemas::get_post_input_schema(),
        ),
        posts::GetPostTool,
    );
    catalog.register(
        describe(
            TOOL_LIST_POSTS,
            "List recent posts, newest first.",
            schemas::list_posts_input_schema(),
        ),
        posts::ListPostsTool,
    );
    catalog.register(
        describe(
            TOOL_INDEX_ASSET,
            "Index a Cloudinary asset in the search backend for natural-language retrieval.",
            schemas::index_asset_input_schema(),
        ),
        assets::IndexAssetTool,
    );
    catalog.register(
        describe(
            TOOL_BULK_INDEX_ASSETS,
            "Index several Cloudinary assets in the search backend with a single request.",
            schemas::bulk_index_assets_input_schema(),
        ),
        assets::BulkIndexAssetsTool,
    );
    catalog
}

/// Trimmed string argument, `None` when absent, not a string, or blank.
pub(crate) fn non_empty_string(arguments: &JsonObject, key: &str) -> Option<String> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// String argument as supplied, `None` only when absent or not a string.
pub(crate) fn present_string(arguments: &JsonObject, key: &str) -> Option<String> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Integer argument accepting JSON numbers or numeric strings.
pub(crate) fn integer_arg(arguments: &JsonObject, key: &str) -> Option<i64> {
    match arguments.get(key)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Positive post identifier.
pub(crate) fn post_id_arg(arguments: &JsonObject) -> Option<u64> {
    integer_arg(arguments, "post_id")
        .filter(|&id| id > 0)
        .map(|id| id as u64)
}

/// Ordered tag list from an array (scalars stringified) or a single string.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                Value::Bool(flag) => Some(flag.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(text)) if !text.is_empty() => vec![text.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn catalog_is_prefixed_and_ordered() {
        let catalog = standard_catalog("wpengine--");
        let names: Vec<_> = catalog.descriptors().map(|d| d.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                "wpengine--get-current-site-info",
                "wpengine--purge-cache",
                "wpengine--create-post",
                "wpengine--update-post",
                "wpengine--get-post",
                "wpengine--list-posts",
                "wpengine--index-cloudinary-asset",
                "wpengine--bulk-index-cloudinary-assets",
            ]
        );
    }

    #[test]
    fn post_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(post_id_arg(&object(json!({ "post_id": 5 }))), Some(5));
        assert_eq!(post_id_arg(&object(json!({ "post_id": "12" }))), Some(12));
        assert_eq!(post_id_arg(&object(json!({ "post_id": 0 }))), None);
        assert_eq!(post_id_arg(&object(json!({ "post_id": "abc" }))), None);
        assert_eq!(post_id_arg(&object(json!({}))), None);
    }

    #[test]
    fn blank_strings_are_missing() {
        let args = object(json!({ "title": "  ", "content": " body " }));
        assert_eq!(non_empty_string(&args, "title"), None);
        assert_eq!(non_empty_string(&args, "content").as_deref(), Some("body"));
        assert_eq!(present_string(&args, "title").as_deref(), Some("  "));
    }

    #[test]
    fn string_list_keeps_order() {
        let tags = string_list(Some(&json!(["b", "a", 3])));
        assert_eq!(tags, vec!["b", "a", "3"]);
        assert_eq!(string_list(Some(&json!("solo"))), vec!["solo"]);
        assert!(string_list(None).is_empty());
    }
}
