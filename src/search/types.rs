//! Errors and document shapes for the search backend.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors returned while talking to the search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No endpoint or bearer token configured.
    #[error(
        "Search backend credentials not configured. Set SEARCH_BACKEND_URL and SEARCH_BACKEND_TOKEN."
    )]
    NotConfigured,
    /// HTTP layer failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Backend reported a GraphQL error.
    #[error("{0}")]
    Graphql(String),
    /// Backend answered with an error status and no GraphQL error message.
    #[error("Search backend returned HTTP {0}")]
    Status(StatusCode),
    /// Response body was not valid JSON.
    #[error("Invalid response from search backend: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Media asset to register with the search backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexableAsset {
    /// Cloudinary public id, unique within the backend.
    pub public_id: String,
    /// Delivery URL.
    pub secure_url: String,
    /// Cloudinary resource type (`image`, `video`, `raw`).
    pub resource_type: String,
    /// File format.
    pub format: String,
    /// Ordered tags.
    pub tags: Vec<String>,
}

impl IndexableAsset {
    /// Identifier of the remote document for this asset.
    pub fn document_id(&self) -> String {
        format!("cloudinary:{}", self.public_id)
    }

    /// Build the wire document, flattening tags into one comma-separated string.
    pub fn to_document(&self, action: &str, site: &str) -> SearchDocument {
        SearchDocument {
            id: self.document_id(),
            data: AssetData {
                public_id: self.public_id.clone(),
                secure_url: self.secure_url.clone(),
                resource_type: self.resource_type.clone(),
                format: self.format.clone(),
                tags: self.tags.join(", "),
            },
            meta: DocumentMeta {
                system: super::SYSTEM_NAME.to_string(),
                action: action.to_string(),
                site: site.to_string(),
            },
        }
    }
}

/// Document submitted to the `index` and `bulkIndex` mutations.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchDocument {
    /// Document key.
    pub id: String,
    /// Searchable attributes.
    pub data: AssetData,
    /// Provenance metadata.
    pub meta: DocumentMeta,
}

/// Searchable attributes of an asset document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssetData {
    /// Cloudinary public id.
    pub public_id: String,
    /// Delivery URL.
    pub secure_url: String,
    /// Resource type.
    pub resource_type: String,
    /// File format.
    pub format: String,
    /// Tags joined with `", "`.
    pub tags: String,
}

/// Provenance attached to every indexed document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentMeta {
    /// Calling system.
    pub system: String,
    /// Tool that produced the document.
    pub action: String,
    /// Site origin.
    pub site: String,
}

/// Result payload of the `index` and `bulkIndex` mutations.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MutationOutcome {
    /// Backend status code, when reported. Numeric codes are kept as their decimal text.
    #[serde(deserialize_with = "code_as_string")]
    pub code: Option<String>,
    /// Whether the backend accepted the documents.
    pub success: Option<bool>,
    /// Human-readable backend message.
    pub message: Option<String>,
}

fn code_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(code)) => Some(code),
        Some(other) => Some(other.to_string()),
    })
}

impl MutationOutcome {
    /// Backend accepted the mutation. An omitted `success` flag counts as accepted.
    pub fn succeeded(&self) -> bool {
        self.success.unwrap_or(true)
    }

    /// Message to show callers.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|message| !message.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_flattens_tags_and_prefixes_id() {
        let asset = IndexableAsset {
            public_id: "folder/cat".into(),
            secure_url: "https://res.cloudinary.com/demo/cat.jpg".into(),
            resource_type: "image".into(),
            format: "jpg".into(),
            tags: vec!["animals".into(), "cats, kittens".into()],
        };
        let document = asset.to_document("index-cloudinary-asset", "https://example.org");

        assert_eq!(document.id, "cloudinary:folder/cat");
        assert_eq!(document.data.tags, "animals, cats, kittens");
        assert_eq!(document.meta.action, "index-cloudinary-asset");
        assert_eq!(document.meta.site, "https://example.org");
    }

    #[test]
    fn missing_success_flag_counts_as_success() {
        let outcome: MutationOutcome =
            serde_json::from_value(serde_json::json!({ "message": "ok" })).expect("outcome");
        assert!(outcome.succeeded());
        assert_eq!(outcome.message_or("fallback"), "ok");
    }

    #[test]
    fn numeric_code_is_accepted() {
        let outcome: MutationOutcome = serde_json::from_value(serde_json::json!({
            "code": 200,
            "success": true,
            "message": "ok"
        }))
        .expect("outcome");
        assert_eq!(outcome.code.as_deref(), Some("200"));
        assert!(outcome.succeeded());

        let outcome: MutationOutcome =
            serde_json::from_value(serde_json::json!({ "code": null })).expect("outcome");
        assert_eq!(outcome.code, None);
    }
}
