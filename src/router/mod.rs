//! Routing module for the widget server

use std::time::Instant;

use crate::state::SharedState;
use axum::{body::Body, extract::Request, middleware::Next, response::Response, Router};
use tower_http::cors::{Any, CorsLayer};

/// Creates and configures the application router with all routes and middleware
pub fn create_app_router(state: SharedState) -> Router {
    // Middleware: CORS (permissive; hosts embed widgets from arbitrary origins)
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(crate::mcp::routes())
        .layer(axum::middleware::from_fn(log_request))
        .layer(cors_layer)
        .with_state(state)
}

async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let res = next.run(req).await;

    let status = res.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_success() {
        tracing::info!(%method, %uri, %status, elapsed_ms, "request");
    } else {
        tracing::warn!(%method, %uri, %status, elapsed_ms, "request failed");
    }
    res
}
