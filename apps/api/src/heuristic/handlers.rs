//! Axum route handler for offline scoring.

use axum::Json;
use tracing::info;

use crate::heuristic::{quick_score, QuickScore, QuickScoreRequest};

/// POST /api/score
pub async fn handle_quick_score(Json(req): Json<QuickScoreRequest>) -> Json<QuickScore> {
    let result = quick_score(&req.text);
    info!(stage = "quick_score", score = result.score, "resume scored offline");
    Json(result)
}
