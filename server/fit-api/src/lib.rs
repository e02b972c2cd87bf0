//! Fit Engine HTTP API
//!
//! HTTP service that runs evaluation requests through the fit engine in-process.
//! Bind to 127.0.0.1 by default (internal only).

mod handlers;
mod state;
mod types;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use handlers::{evaluate, evaluate_batch, health};
pub use state::{AppState, DEFAULT_MAX_BATCH};
pub use types::{BatchItem, BatchResponse};

pub fn app(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/evaluate", post(evaluate))
    .route("/evaluate/batch", post(evaluate_batch))
    .layer(CorsLayer::permissive())
    .with_state(state)
}
