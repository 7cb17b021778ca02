// Scoring prompt template.
// Placeholders are substituted in one pass over the template, so the JSON schema
// braces and any placeholder-like text inside the inputs stay literal.

pub const JOB_DESCRIPTION_FALLBACK: &str = "N/A";

pub const RESUME_SCORE_PROMPT: &str = r#"Analyze this resume and return a JSON response evaluating:
- ATS compatibility
- Skill relevance
- Experience level
- Formatting
- Match with job description (if provided)

Resume:
{resume_text}

Job Description:
{job_description}

Every score is a number from 0 to 100.
Return ONLY JSON with this format, no markdown fences, no explanations:
{
  "overallScore": number,
  "atsScore": number,
  "skillsScore": number,
  "experienceScore": number,
  "formatScore": number,
  "strengths": ["string"],
  "improvements": ["string"],
  "suggestions": ["string"]
}"#;

pub fn build_score_prompt(resume_text: &str, job_description: &str) -> String {
    let job_description = match job_description.trim() {
        "" => JOB_DESCRIPTION_FALLBACK,
        jd => jd,
    };
    render(
        RESUME_SCORE_PROMPT,
        &[
            ("{resume_text}", resume_text.trim()),
            ("{job_description}", job_description),
        ],
    )
}

/// Replaces each placeholder occurrence in `template` with its value.
/// Substituted values are never scanned again.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = vars
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
            .min_by_key(|(at, _, _)| *at);
        let Some((at, key, value)) = next else {
            break;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }
    out.push_str(rest);
    out
}
