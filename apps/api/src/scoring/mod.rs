//! Scoring Client: prompt the generator once and turn its reply into a `ScoreReport`.
//!
//! Scoring is all-or-nothing: any generator failure, missing JSON object or
//! schema violation yields `ScoringError` and no partial report.

pub mod json_scan;
pub mod prompts;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::llm_client::{LlmError, TextGenerator};
use crate::scoring::json_scan::extract_json_object;
use crate::scoring::prompts::build_score_prompt;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("generator call failed: {0}")]
    Generator(#[from] LlmError),

    #[error("reply contains no JSON object")]
    NoJsonObject,

    #[error("reply does not match the score schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("{field} must be between 0 and 100, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Structured evaluation returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub overall_score: f64,
    pub ats_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub format_score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ScoreReport {
    /// Parses and validates a JSON value against the score schema.
    pub fn from_value(value: Value) -> Result<Self, ScoringError> {
        let report: ScoreReport = serde_json::from_value(value)?;
        report.validate()?;
        Ok(report)
    }

    fn validate(&self) -> Result<(), ScoringError> {
        let fields = [
            ("overallScore", self.overall_score),
            ("atsScore", self.ats_score),
            ("skillsScore", self.skills_score),
            ("experienceScore", self.experience_score),
            ("formatScore", self.format_score),
        ];
        for (field, value) in fields {
            if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                return Err(ScoringError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// Parses a free-text model reply into a validated `ScoreReport`.
pub fn parse_score_reply(reply: &str) -> Result<ScoreReport, ScoringError> {
    let value = extract_json_object(reply).ok_or(ScoringError::NoJsonObject)?;
    ScoreReport::from_value(value)
}

/// Scores resume text against an optional job description.
/// Exactly one generator call per invocation.
pub async fn score_resume(
    generator: &dyn TextGenerator,
    resume_text: &str,
    job_description: &str,
) -> Result<ScoreReport, ScoringError> {
    let prompt = build_score_prompt(resume_text, job_description);
    let reply = generator.generate(&prompt).await?;
    debug!(reply_chars = reply.len(), "generator replied");

    let report = parse_score_reply(&reply)?;
    info!(
        overall = report.overall_score,
        has_job_description = !job_description.trim().is_empty(),
        "resume scored"
    );
    Ok(report)
}
