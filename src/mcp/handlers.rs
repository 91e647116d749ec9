//! MCP (Model Context Protocol) route handlers
//!
//! This module hosts the handler registry over HTTP: it decodes JSON-RPC
//! envelopes, resolves the caller's bearer token and dispatches each request
//! to whatever handler is bound for its method.

use super::{
    dispatch::{codes, McpRequest, RequestContext, RequestKind},
    helpers::*,
    models::*,
};
use crate::{auth::token::bearer_token, state::SharedState};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

/// Creates routes for MCP-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(handle_mcp).get(handle_mcp_sse))
        .route("/mcp", post(handle_mcp).get(handle_mcp_sse)) // Standard endpoint
        .route("/mcp/", post(handle_mcp).get(handle_mcp_sse)) // Trailing slash safety
}

/// Handle SSE (Server-Sent Events) handshake for GET requests
async fn handle_mcp_sse() -> impl IntoResponse {
    (
        [("content-type", "text/event-stream")],
        "event: endpoint\ndata: /mcp\n\n",
    )
}

/// Endpoint: POST /mcp
/// Handles the Model Context Protocol communication for POST requests.
async fn handle_mcp(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Json<JsonRpcRequest>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    // Parse JSON-RPC Request (POST)
    let req = match body {
        Ok(Json(r)) => r,
        Err(e) => {
            tracing::warn!(error = %e.body_text(), "JSON parse error");
            return (
                StatusCode::BAD_REQUEST,
                Json(rpc_error(Value::Null, codes::PARSE_ERROR, "Parse error")),
            )
                .into_response();
        }
    };

    let id = req.id.unwrap_or(Value::Null);
    let method_name = req.method.as_str();
    let params = req.params.unwrap_or(Value::Null);

    tracing::debug!(method = method_name, id = %id, "MCP call");

    // Dispatch Method
    let response_body = match method_name {
        "notifications/initialized" => rpc_success(id, json!({})),
        method => match RequestKind::from_method(method) {
            Some(kind) => {
                let request = McpRequest {
                    params,
                    context: resolve_context(&state, &headers).await,
                };
                rpc_response(id, state.handlers.dispatch(kind, request).await)
            }
            None => {
                tracing::warn!(method, "unknown method");
                rpc_error(id, codes::METHOD_NOT_FOUND, "Method not found")
            }
        },
    };

    Json(response_body).into_response()
}

/// Verifies the bearer token, if any. An unrecognised token is dropped so
/// the call proceeds as anonymous and auth policy decides.
async fn resolve_context(state: &SharedState, headers: &HeaderMap) -> RequestContext {
    let Some(raw) = bearer_token(headers) else {
        return RequestContext::default();
    };

    let access_token = state.verifier.verify(raw).await;
    if access_token.is_none() {
        tracing::warn!("rejected unrecognised bearer token");
    }
    RequestContext { access_token }
}
