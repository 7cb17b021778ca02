use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::scoring::ScoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Only `InvalidUpload` messages reach the client verbatim; every other
/// variant is logged with its detail and answered with a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(_) | AppError::Scoring(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::InvalidUpload(msg) => {
                tracing::warn!(stage = "upload", "Rejected upload: {msg}");
                msg.clone()
            }
            AppError::Extraction(e) => {
                tracing::error!(stage = "extraction", "Extraction error: {e}");
                "Failed to extract text from resume".to_string()
            }
            AppError::Scoring(e) => {
                tracing::error!(stage = "scoring", "Scoring error: {e}");
                "Failed to analyze resume".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
