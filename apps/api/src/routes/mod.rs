pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Proposal API
        .route("/api/v1/proposals", post(handlers::handle_generate))
        .route("/api/v1/proposals/:id", get(handlers::handle_get_proposal))
        .route(
            "/api/v1/proposals/extract",
            post(handlers::handle_extract),
        )
        .with_state(state)
}
