use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;
use service::storage::memory_store::PayloadStore;

use crate::observability;

pub mod payloads;

/// State shared by every handler; cloning only bumps the store's refcount.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PayloadStore>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    observability::encode_metrics()
}

/// Build the application router: payload routes plus health and metrics.
pub fn build_router(store: Arc<PayloadStore>, cors: CorsLayer, max_body_bytes: usize) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/upload", post(payloads::upload))
        .route("/data", get(payloads::list))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx only
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
