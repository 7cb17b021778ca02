//! Brace-balance scanner for JSON objects embedded in free text.
//!
//! Model replies often wrap the object in prose or markdown fences. The scanner
//! walks the text tracking `{`/`}` depth, ignoring braces inside string
//! literals, and returns the first balanced object that parses as JSON.

use serde_json::Value;

/// Returns the first balanced `{...}` span in `text` that is valid JSON.
///
/// Candidates that are balanced but fail to parse are skipped and scanning
/// resumes at the next `{` after the rejected candidate's opening brace.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let mut from = 0;
    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        if let Some(end) = balanced_object_end(&text[start..]) {
            let candidate = &text[start..start + end];
            if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
                return Some(value);
            }
        }
        from = start + 1;
    }
    None
}

/// Given text starting at `{`, returns the byte length of the balanced object,
/// or `None` if the text ends before depth returns to zero.
fn balanced_object_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}
