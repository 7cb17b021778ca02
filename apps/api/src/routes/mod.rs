pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::heuristic::handlers::handle_quick_score;
use crate::state::AppState;
use crate::upload::FORM_OVERHEAD_BYTES;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/score", post(handle_quick_score))
        .route(
            "/analyze-resume",
            post(handlers::handle_analyze_resume).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
