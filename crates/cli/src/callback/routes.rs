use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::CallbackState;

pub fn create_router(state: Arc<CallbackState>) -> Router {
    Router::new()
        .route("/", get(handlers::challenge).post(handlers::receive))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
