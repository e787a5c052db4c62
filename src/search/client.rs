//! HTTP client wrapper for the search backend's GraphQL API.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};

use crate::credentials::SearchBackendCredential;
use crate::search::{
    BULK_INDEX_MUTATION, INDEX_MUTATION,
    types::{MutationOutcome, SearchDocument, SearchError},
};

/// Upper bound for a single request to the search backend.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Lightweight HTTP client for search backend mutations.
///
/// The client holds no credentials; callers pass the snapshot taken for the current request.
pub struct SearchClient {
    pub(crate) client: Client,
}

impl SearchClient {
    /// Build a client with the standard user agent and request timeout.
    pub fn new() -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(concat!("site-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Send a GraphQL request and return its `data` member.
    ///
    /// A top-level `errors` array wins over the HTTP status: its first message is returned.
    /// Otherwise any status of 400 or above is reported as [`SearchError::Status`].
    pub async fn execute(
        &self,
        credential: Option<&SearchBackendCredential>,
        query: &str,
        variables: Value,
    ) -> Result<Value, SearchError> {
        let credential = credential.ok_or(SearchError::NotConfigured)?;

        let response = self
            .client
            .post(&credential.endpoint_url)
            .bearer_auth(&credential.bearer_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let payload = serde_json::from_str::<Value>(&body);

        if let Ok(value) = &payload
            && let Some(message) = first_graphql_error(value)
        {
            tracing::warn!(%status, error = %message, "Search backend returned GraphQL errors");
            return Err(SearchError::Graphql(message));
        }

        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(%status, "Search backend request failed");
            return Err(SearchError::Status(status));
        }

        let value = payload?;
        Ok(value.get("data").cloned().unwrap_or(Value::Null))
    }

    /// Index one document.
    pub async fn index_document(
        &self,
        credential: Option<&SearchBackendCredential>,
        document: &SearchDocument,
    ) -> Result<MutationOutcome, SearchError> {
        let data = self
            .execute(credential, INDEX_MUTATION, json!({ "input": document }))
            .await?;
        let outcome = mutation_outcome(&data, "index")?;
        tracing::debug!(
            document_id = %document.id,
            success = outcome.succeeded(),
            "Index mutation completed"
        );
        Ok(outcome)
    }

    /// Index several documents with one request.
    pub async fn bulk_index(
        &self,
        credential: Option<&SearchBackendCredential>,
        documents: &[SearchDocument],
    ) -> Result<MutationOutcome, SearchError> {
        let data = self
            .execute(
                credential,
                BULK_INDEX_MUTATION,
                json!({ "input": { "documents": documents } }),
            )
            .await?;
        let outcome = mutation_outcome(&data, "bulkIndex")?;
        tracing::debug!(
            documents = documents.len(),
            success = outcome.succeeded(),
            "Bulk index mutation completed"
        );
        Ok(outcome)
    }
}

fn first_graphql_error(value: &Value) -> Option<String> {
    let errors = value.get("errors")?.as_array()?;
    let first = errors.first()?;
    Some(
        first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown GraphQL error")
            .to_string(),
    )
}

fn mutation_outcome(data: &Value, field: &str) -> Result<MutationOutcome, SearchError> {
    match data.get(field) {
        Some(Value::Null) | None => Ok(MutationOutcome::default()),
        Some(value) => Ok(serde_json::from_value(value.clone())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::IndexableAsset;
    use httpmock::{Method::POST, MockServer};

    fn credential(server: &MockServer) -> SearchBackendCredential {
        SearchBackendCredential {
            endpoint_url: server.url("/graphql"),
            bearer_token: "search-token".into(),
        }
    }

    fn document() -> SearchDocument {
        IndexableAsset {
            public_id: "cat".into(),
            secure_url: "https://res.cloudinary.com/demo/cat.jpg".into(),
            resource_type: "image".into(),
            format: "jpg".into(),
            tags: vec!["a".into(), "b".into()],
        }
        .to_document("index-cloudinary-asset", "https://example.org")
    }

    #[tokio::test]
    async fn index_document_sends_authenticated_mutation() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/graphql")
                    .header("authorization", "Bearer search-token")
                    .body_contains("IndexDocument")
                    .body_contains(r#""id":"cloudinary:cat""#)
                    .body_contains(r#""tags":"a, b""#);
                then.status(200).json_body(json!({
                    "data": {
                        "index": { "code": 200, "success": true, "message": "Document indexed" }
                    }
                }));
            })
            .await;

        let client = SearchClient::new().expect("client");
        let outcome = client
            .index_document(Some(&credential(&server)), &document())
            .await
            .expect("index");

        mock.assert_async().await;
        assert!(outcome.succeeded());
        assert_eq!(outcome.code.as_deref(), Some("200"));
        assert_eq!(outcome.message.as_deref(), Some("Document indexed"));
    }

    #[tokio::test]
    async fn graphql_errors_surface_first_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(200).json_body(json!({
                    "errors": [{ "message": "bad input" }, { "message": "second" }]
                }));
            })
            .await;

        let err = SearchClient::new()
            .expect("client")
            .execute(Some(&credential(&server)), INDEX_MUTATION, json!({}))
            .await
            .expect_err("graphql error");
        assert!(matches!(err, SearchError::Graphql(ref message) if message == "bad input"));
    }

    #[tokio::test]
    async fn error_status_without_errors_reports_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(503).body("unavailable");
            })
            .await;

        let err = SearchClient::new()
            .expect("client")
            .execute(Some(&credential(&server)), INDEX_MUTATION, json!({}))
            .await
            .expect_err("status error");
        assert!(matches!(err, SearchError::Status(status) if status.as_u16() == 503));
        assert_eq!(err.to_string(), "Search backend returned HTTP 503 Service Unavailable");
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_network_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200);
            })
            .await;

        let err = SearchClient::new()
            .expect("client")
            .execute(None, INDEX_MUTATION, json!({}))
            .await
            .expect_err("not configured");

        assert!(matches!(err, SearchError::NotConfigured));
        assert!(err.to_string().contains("credentials not configured"));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn bulk_index_wraps_documents() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/graphql")
                    .body_contains("bulkIndex")
                    .body_contains(r#""documents":[{"#);
                then.status(200).json_body(json!({
                    "data": { "bulkIndex": { "success": true, "message": "ok" } }
                }));
            })
            .await;

        let outcome = SearchClient::new()
            .expect("client")
            .bulk_index(Some(&credential(&server)), &[document()])
            .await
            .expect("bulk index");

        mock.assert_async().await;
        assert!(outcome.succeeded());
    }
}
