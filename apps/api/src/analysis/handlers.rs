//! Axum route handler for resume analysis.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract;
use crate::scoring::{score_resume, ScoreReport};
use crate::state::AppState;
use crate::upload::{receive_upload, ResumeUpload, UploadedDocument};

pub const SUCCESS_MESSAGE: &str = "Resume analyzed successfully";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub message: &'static str,
    pub file_name: String,
    pub data: ScoreReport,
}

/// POST /analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let ResumeUpload {
        document,
        job_description,
    } = receive_upload(
        multipart,
        &state.config.upload_dir,
        state.config.max_upload_bytes,
    )
    .await?;

    let outcome = analyze(&state, &document, &job_description).await;

    // Remove the scratch file before the response leaves, on success and failure alike.
    let UploadedDocument {
        scratch,
        original_name,
        ..
    } = document;
    scratch.remove().await;

    let data = outcome?;
    info!(stage = "respond", file = %original_name, "analysis complete");
    Ok(Json(AnalyzeResponse {
        success: true,
        message: SUCCESS_MESSAGE,
        file_name: original_name,
        data,
    }))
}

async fn analyze(
    state: &AppState,
    document: &UploadedDocument,
    job_description: &str,
) -> Result<ScoreReport, AppError> {
    let text = extract(document.stored_path(), document.kind).await?;
    let report = score_resume(state.generator.as_ref(), &text.content, job_description).await?;
    Ok(report)
}
