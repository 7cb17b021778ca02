//! Offline resume scoring: word-count, section and keyword rules, no external service.
//!
//! Algorithm:
//! 1. Start at `BASE_SCORE`.
//! 2. Under `MIN_WORDS` or over `MAX_WORDS` words costs `LENGTH_PENALTY`.
//! 3. Each missing section in `SECTIONS` costs `SECTION_PENALTY`.
//! 4. Mentioning Python earns `KEYWORD_BONUS`, otherwise a feedback line.
//! 5. Clamp to [0, 100]; with no feedback, return `DEFAULT_FEEDBACK`.

pub mod handlers;

use serde::{Deserialize, Serialize};

pub const BASE_SCORE: i32 = 70;
pub const MIN_WORDS: usize = 150;
pub const MAX_WORDS: usize = 800;
pub const LENGTH_PENALTY: i32 = 10;
pub const SECTION_PENALTY: i32 = 5;
pub const KEYWORD_BONUS: i32 = 5;
pub const SECTIONS: [&str; 4] = ["education", "experience", "skills", "projects"];
pub const KEYWORD: &str = "python";

pub const TOO_SHORT: &str = "Too short. Aim for at least 1 page (~300 words).";
pub const TOO_LONG: &str = "Too long. Keep it under 2 pages.";
pub const MISSING_KEYWORD: &str = "Add more technical skills (e.g., Python, SQL).";
pub const DEFAULT_FEEDBACK: &str = "Looks good! Fine-tune formatting for better readability.";

#[derive(Debug, Default, Deserialize)]
pub struct QuickScoreRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickScore {
    pub score: i32,
    pub feedback: Vec<String>,
}

pub fn quick_score(resume_text: &str) -> QuickScore {
    let mut score = BASE_SCORE;
    let mut feedback = Vec::new();

    let words = resume_text.split_whitespace().count();
    if words < MIN_WORDS {
        score -= LENGTH_PENALTY;
        feedback.push(TOO_SHORT.to_string());
    } else if words > MAX_WORDS {
        score -= LENGTH_PENALTY;
        feedback.push(TOO_LONG.to_string());
    }

    let lowered = resume_text.to_lowercase();
    for section in SECTIONS {
        if !lowered.contains(section) {
            score -= SECTION_PENALTY;
            feedback.push(format!("Missing '{}' section.", title_case(section)));
        }
    }

    if lowered.contains(KEYWORD) {
        score += KEYWORD_BONUS;
    } else {
        feedback.push(MISSING_KEYWORD.to_string());
    }

    if feedback.is_empty() {
        feedback.push(DEFAULT_FEEDBACK.to_string());
    }

    QuickScore {
        score: score.clamp(0, 100),
        feedback,
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
