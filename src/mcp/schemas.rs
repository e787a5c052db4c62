//! JSON schema builders for MCP tools.

use serde_json::{Map, Value};

use super::protocol::JsonObject;

const WRITABLE_STATUSES: [&str; 3] = ["publish", "draft", "pending"];

/// Schema for tools that take no arguments.
pub(crate) fn empty_object_schema() -> JsonObject {
    finalize_object_schema(Map::new(), &[])
}

/// Schema describing the `create-post` input.
pub(crate) fn create_post_input_schema() -> JsonObject {
    let mut properties = Map::new();
    properties.insert("title".into(), string_schema("Post title"));
    properties.insert(
        "content".into(),
        string_schema("Post content (HTML allowed; unsafe markup is removed)"),
    );
    properties.insert(
        "status".into(),
        enum_schema("Post status; defaults to publish", &WRITABLE_STATUSES),
    );
    properties.insert(
        "cloudinary_url".into(),
        string_schema("Optional Cloudinary image URL embedded at the top of the content"),
    );
    properties.insert(
        "cloudinary_public_id".into(),
        string_schema("Optional Cloudinary public id stored with the post"),
    );

    finalize_object_schema(properties, &["title", "content"])
}

/// Schema describing the `update-post` input.
pub(crate) fn update_post_input_schema() -> JsonObject {
    let mut properties = Map::new();
    properties.insert("post_id".into(), integer_schema("ID of the post to update"));
    properties.insert("title".into(), string_schema("New title"));
    properties.insert("content".into(), string_schema("New content (HTML allowed)"));
    properties.insert(
        "status".into(),
        enum_schema("New status", &WRITABLE_STATUSES),
    );

    finalize_object_schema(properties, &["post_id"])
}

/// Schema describing the `get-post` input.
pub(crate) fn get_post_input_schema() -> JsonObject {
    let mut properties = Map::new();
    properties.insert("post_id".into(), integer_schema("ID of the post to fetch"));

    finalize_object_schema(properties, &["post_id"])
}

/// Schema describing the `list-posts` input.
pub(crate) fn list_posts_input_schema() -> JsonObject {
    let mut properties = Map::new();

    let mut limit_schema = Map::new();
    limit_schema.insert("type".into(), Value::String("integer".into()));
    limit_schema.insert(
        "description".into(),
        Value::String("Number of posts to return (default 10, max 100)".into()),
    );
    limit_schema.insert("default".into(), Value::Number(10.into()));
    limit_schema.insert("minimum".into(), Value::Number(1.into()));
    limit_schema.insert("maximum".into(), Value::Number(100.into()));
    properties.insert("limit".into(), Value::Object(limit_schema));

    let mut status_schema = Map::new();
    status_schema.insert("type".into(), Value::String("string".into()));
    status_schema.insert(
        "description".into(),
        Value::String("Filter by status (publish, draft, pending, private, future, any)".into()),
    );
    status_schema.insert("default".into(), Value::String("publish".into()));
    properties.insert("status".into(), Value::Object(status_schema));

    finalize_object_schema(properties, &[])
}

/// Schema describing the `index-cloudinary-asset` input.
pub(crate) fn index_asset_input_schema() -> JsonObject {
    finalize_object_schema(
        asset_properties(),
        &["public_id", "secure_url", "resource_type", "format"],
    )
}

/// Schema describing the `bulk-index-cloudinary-assets` input.
pub(crate) fn bulk_index_assets_input_schema() -> JsonObject {
    let mut item_schema = Map::new();
    item_schema.insert("type".into(), Value::String("object".into()));
    item_schema.insert("properties".into(), Value::Object(asset_properties()));
    item_schema.insert(
        "required".into(),
        Value::Array(vec![
            Value::String("public_id".into()),
            Value::String("secure_url".into()),
        ]),
    );

    let mut assets_schema = Map::new();
    assets_schema.insert("type".into(), Value::String("array".into()));
    assets_schema.insert(
        "description".into(),
        Value::String("Assets to index; entries without public_id or secure_url are skipped".into()),
    );
    assets_schema.insert("items".into(), Value::Object(item_schema));

    let mut properties = Map::new();
    properties.insert("assets".into(), Value::Object(assets_schema));

    finalize_object_schema(properties, &["assets"])
}

fn asset_properties() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("public_id".into(), string_schema("Cloudinary public id"));
    properties.insert("secure_url".into(), string_schema("Cloudinary HTTPS delivery URL"));
    properties.insert(
        "resource_type".into(),
        string_schema("Cloudinary resource type (image, video, raw)"),
    );
    properties.insert("format".into(), string_schema("File format, e.g. jpg or mp4"));

    let mut tag_item_schema = Map::new();
    tag_item_schema.insert("type".into(), Value::String("string".into()));
    let mut tags_schema = Map::new();
    tags_schema.insert("type".into(), Value::String("array".into()));
    tags_schema.insert(
        "description".into(),
        Value::String("Optional tags describing the asset".into()),
    );
    tags_schema.insert("items".into(), Value::Object(tag_item_schema));
    properties.insert("tags".into(), Value::Object(tags_schema));

    properties
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn integer_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("integer".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn enum_schema(description: &str, variants: &[&str]) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    schema.insert(
        "enum".into(),
        Value::Array(
            variants
                .iter()
                .map(|&variant| Value::String(variant.into()))
                .collect(),
        ),
    );
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> JsonObject {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema
}
