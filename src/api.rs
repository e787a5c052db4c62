//! HTTP surface for the site MCP endpoint.
//!
//! One route is exposed: `POST /{namespace}/mcp`. Requests pass the token middleware from
//! [`crate::auth`] before the body is handed to the shared [`Dispatcher`]. Every authenticated
//! request is answered with HTTP 200 and a JSON-RPC envelope, including protocol errors.

use std::sync::Arc;

use axum::{Extension, Json, Router, body::Bytes, extract::State, middleware, routing::post};

use crate::auth::require_token;
use crate::credentials::{CredentialSnapshot, CredentialStore};
use crate::mcp::{Dispatcher, RpcResponse};

/// Shared state for the router and the auth middleware.
#[derive(Clone)]
pub struct AppState {
    /// Request dispatcher.
    pub dispatcher: Arc<Dispatcher>,
    /// Credential store consulted on every request.
    pub credentials: Arc<CredentialStore>,
}

/// Path of the MCP route under `namespace`.
pub fn mcp_path(namespace: &str) -> String {
    format!("/{}/mcp", namespace.trim_matches('/'))
}

/// Build the HTTP router exposing the MCP endpoint.
pub fn create_router(state: AppState, namespace: &str) -> Router {
    Router::new()
        .route(&mcp_path(namespace), post(handle_mcp))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

async fn handle_mcp(
    State(state): State<AppState>,
    Extension(credentials): Extension<Arc<CredentialSnapshot>>,
    body: Bytes,
) -> Json<RpcResponse> {
    let response = state.dispatcher.dispatch_with(credentials, &body).await;
    if let Some(error) = &response.error {
        tracing::debug!(code = error.code, message = %error.message, "MCP protocol error");
    }
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::credentials::AccessCredential;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn router() -> Router {
        let credentials = Arc::new(CredentialStore::new(AccessCredential::new("secret"), None));
        let dispatcher = Arc::new(
            Dispatcher::from_config(&Config::default(), credentials.clone()).expect("dispatcher"),
        );
        create_router(
            AppState {
                dispatcher,
                credentials,
            },
            "wpengine/v1",
        )
    }

    fn request(token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/wpengine/v1/mcp")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("X-MCP-Token", token);
        }
        builder
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[test]
    fn path_normalizes_slashes() {
        assert_eq!(mcp_path("/wpengine/v1/"), "/wpengine/v1/mcp");
    }

    #[tokio::test]
    async fn missing_token_is_rejected_before_dispatch() {
        let app = router();
        let response = app
            .clone()
            .oneshot(request(
                None,
                json!({
                    "id": 1,
                    "method": "tools/call",
                    "params": {
                        "name": "wpengine--create-post",
                        "arguments": { "title": "T", "content": "C" }
                    }
                }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["code"], "unauthorized");
        assert_eq!(
            body["message"],
            "Authentication required. Please provide X-MCP-Token header."
        );
        assert_eq!(body["data"]["status"], 401);

        let listed = app
            .oneshot(request(
                Some("secret"),
                json!({
                    "id": 2,
                    "method": "tools/call",
                    "params": { "name": "wpengine--list-posts", "arguments": { "status": "any" } }
                }),
            ))
            .await
            .expect("response");
        let body = json_body(listed).await;
        assert_eq!(body["result"]["content"][0]["text"], "No posts found.");
    }

    #[tokio::test]
    async fn wrong_token_is_rejected() {
        let response = router()
            .oneshot(request(Some("secret "), json!({ "id": 1, "method": "tools/list" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Invalid authentication token.");
    }

    #[tokio::test]
    async fn valid_token_reaches_dispatcher() {
        let response = router()
            .oneshot(request(Some("secret"), json!({ "id": 5, "method": "ping" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], 5);
        assert_eq!(body["error"]["code"], -32601);
    }
}
