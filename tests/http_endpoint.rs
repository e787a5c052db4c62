use std::sync::Arc;

use httpmock::{Method::POST, MockServer};
use serde_json::{Value, json};
use sitemcp::{
    api::{self, AppState},
    config::{Config, SiteConfig},
    credentials::{AccessCredential, CredentialStore, SearchBackendCredential},
    mcp::Dispatcher,
};
use tokio::net::TcpListener;

const TOKEN: &str = "0123456789abcdef0123456789abcdef";

struct TestServer {
    base_url: String,
    credentials: Arc<CredentialStore>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(search: Option<SearchBackendCredential>) -> Self {
        let config = Config {
            site: SiteConfig {
                name: "Test Site".into(),
                url: "https://site.test".into(),
                ..SiteConfig::default()
            },
            ..Config::default()
        };
        let credentials = Arc::new(CredentialStore::new(AccessCredential::new(TOKEN), search));
        let dispatcher =
            Arc::new(Dispatcher::from_config(&config, credentials.clone()).expect("dispatcher"));
        let app = api::create_router(
            AppState {
                dispatcher,
                credentials: credentials.clone(),
            },
            &config.namespace,
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            base_url: format!("http://{addr}/wpengine/v1/mcp"),
            credentials,
            client: reqwest::Client::new(),
        }
    }

    async fn post(&self, token: Option<&str>, body: Value) -> (u16, Value) {
        let mut request = self.client.post(&self.base_url).json(&body);
        if let Some(token) = token {
            request = request.header("X-MCP-Token", token);
        }
        let response = request.send().await.expect("request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> String {
        let (status, body) = self
            .post(
                Some(TOKEN),
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "tools/call",
                    "params": { "name": name, "arguments": arguments }
                }),
            )
            .await;
        assert_eq!(status, 200);
        body["result"]["content"][0]["text"]
            .as_str()
            .expect("text content")
            .to_string()
    }
}

#[tokio::test]
async fn rejects_requests_without_a_valid_token() {
    let server = TestServer::start(None).await;

    let (status, body) = server
        .post(None, json!({ "id": 1, "method": "tools/list" }))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], "unauthorized");

    let (status, body) = server
        .post(Some("not-the-token"), json!({ "id": 1, "method": "tools/list" }))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["message"], "Invalid authentication token.");
}

#[tokio::test]
async fn rotated_token_applies_to_the_next_request() {
    let server = TestServer::start(None).await;
    server
        .credentials
        .rotate_access_token(AccessCredential::new("fresh-token"));

    let (status, _) = server
        .post(Some(TOKEN), json!({ "id": 1, "method": "tools/list" }))
        .await;
    assert_eq!(status, 401);

    let (status, body) = server
        .post(Some("fresh-token"), json!({ "id": 1, "method": "tools/list" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["tools"].as_array().map(Vec::len), Some(8));
}

#[tokio::test]
async fn post_lifecycle_over_http() {
    let server = TestServer::start(None).await;

    let created = server
        .call_tool(
            "wpengine--create-post",
            json!({ "title": "Launch", "content": "<p>Hello</p>", "status": "draft" }),
        )
        .await;
    assert!(created.starts_with("Post created successfully!"));
    assert!(created.contains("URL: https://site.test/?p=1"));

    let updated = server
        .call_tool(
            "wpengine--update-post",
            json!({ "post_id": 1, "status": "publish" }),
        )
        .await;
    assert!(updated.contains("Status: publish"));

    let listed = server
        .call_tool("wpengine--list-posts", json!({}))
        .await;
    assert!(listed.starts_with("Found 1 posts:"));

    let purged = server.call_tool("wpengine--purge-cache", json!({})).await;
    assert_eq!(purged, "Cache purged successfully for site: Test Site");
}

#[tokio::test]
async fn bulk_index_reaches_search_backend() {
    let backend = MockServer::start_async().await;
    let mock = backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/graphql")
                .header("authorization", "Bearer search-secret")
                .body_contains("bulkIndex")
                .body_contains(r#""id":"cloudinary:a""#)
                .body_contains(r#""site":"https://site.test""#);
            then.status(200).json_body(json!({
                "data": { "bulkIndex": { "code": "OK", "success": true, "message": "Indexed 1" } }
            }));
        })
        .await;

    let search =
        SearchBackendCredential::from_parts(Some(&backend.url("/graphql")), Some("search-secret"));
    let server = TestServer::start(search).await;

    let text = server
        .call_tool(
            "wpengine--bulk-index-cloudinary-assets",
            json!({
                "assets": [
                    { "public_id": "a", "secure_url": "u", "tags": ["x", "y"] },
                    { "public_id": "", "secure_url": "u2" }
                ]
            }),
        )
        .await;

    mock.assert_async().await;
    assert!(text.contains("Assets Indexed: 1"));
    assert!(text.contains("Message: Indexed 1"));
}

#[tokio::test]
async fn search_backend_errors_become_tool_errors() {
    let backend = MockServer::start_async().await;
    backend
        .mock_async(|when, then| {
            when.method(POST).path("/graphql");
            then.status(500).json_body(json!({ "errors": [{ "message": "index offline" }] }));
        })
        .await;

    let search = SearchBackendCredential::from_parts(Some(&backend.url("/graphql")), Some("t"));
    let server = TestServer::start(search).await;

    let text = server
        .call_tool(
            "wpengine--index-cloudinary-asset",
            json!({
                "public_id": "cat",
                "secure_url": "https://x/cat.jpg",
                "resource_type": "image",
                "format": "jpg"
            }),
        )
        .await;
    assert_eq!(text, "Error: Failed to index asset: index offline");
}
