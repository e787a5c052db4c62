//! Per-request token authentication for the MCP endpoint.
//!
//! The check runs as axum middleware ahead of the MCP handler, so a denied request never has its
//! body read. Denials answer with HTTP 401 and a small JSON error that is not a JSON-RPC envelope.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::api::AppState;
use crate::credentials::AccessCredential;

/// Header carrying the access token.
pub const TOKEN_HEADER: &str = "x-mcp-token";

/// Reason an inbound request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Header absent or empty.
    Missing,
    /// Header present but different from the stored token.
    Invalid,
}

impl DenyReason {
    /// Message returned to the caller.
    pub fn message(self) -> &'static str {
        match self {
            Self::Missing => "Authentication required. Please provide X-MCP-Token header.",
            Self::Invalid => "Invalid authentication token.",
        }
    }
}

/// Outcome of [`authenticate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// Token matched exactly.
    Allowed,
    /// Request must be rejected.
    Denied(DenyReason),
}

/// Compare the supplied header value with the stored access token.
pub fn authenticate(header_token: Option<&str>, credential: &AccessCredential) -> AuthDecision {
    let Some(supplied) = header_token.filter(|value| !value.is_empty()) else {
        return AuthDecision::Denied(DenyReason::Missing);
    };

    let expected = credential.token();
    if expected.is_empty() {
        return AuthDecision::Denied(DenyReason::Invalid);
    }

    if bool::from(supplied.as_bytes().ct_eq(expected.as_bytes())) {
        AuthDecision::Allowed
    } else {
        AuthDecision::Denied(DenyReason::Invalid)
    }
}

/// Middleware rejecting requests without a valid `X-MCP-Token` header.
///
/// Accepted requests carry the credential snapshot used for the check as an extension, so the
/// handler sees the same credentials.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    let snapshot = state.credentials.snapshot();

    match authenticate(header, &snapshot.access) {
        AuthDecision::Allowed => {
            request.extensions_mut().insert(snapshot);
            next.run(request).await
        }
        AuthDecision::Denied(reason) => {
            tracing::warn!(reason = ?reason, "MCP request rejected");
            unauthorized(reason)
        }
    }
}

fn unauthorized(reason: DenyReason) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "code": "unauthorized",
            "message": reason.message(),
            "data": { "status": 401 },
        })),
    )
        .into_response()
}
