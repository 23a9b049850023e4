//! Structured-output parsing with explicit repair stages.
//!
//! Models return best-effort JSON, frequently wrapped in markdown fences
//! or prose, occasionally with trailing commas. Recovery is a ladder of
//! explicit attempts, strictest first — each stage is an ordinary
//! `Result`, not control flow hidden in error handlers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("generator returned empty output")]
    Empty,

    #[error("generator output is not valid JSON: {preview}")]
    Invalid { preview: String },
}

/// Parse generator output into JSON.
///
/// 1. the raw text as-is;
/// 2. the text with surrounding markdown code fences stripped;
/// 3. a structural repair pass — slice from the first `{` to the last
///    `}` and drop trailing commas before closing brackets.
pub fn parse_payload(text: &str) -> Result<serde_json::Value, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_fences(trimmed);
    if let Ok(value) = serde_json::from_str(unfenced) {
        return Ok(value);
    }

    repair(unfenced).ok_or_else(|| ParseError::Invalid {
        preview: preview(trimmed),
    })
}

/// Remove a surrounding ```json ... ``` (or plain ```) fence.
fn strip_fences(text: &str) -> &str {
    let mut t = text.trim();
    if let Some(rest) = t.strip_prefix("```json") {
        t = rest;
    } else if let Some(rest) = t.strip_prefix("```") {
        t = rest;
    }
    if let Some(rest) = t.strip_suffix("```") {
        t = rest;
    }
    t.trim()
}

/// Best-effort structural repair: extract the outermost object, then retry
/// with trailing commas removed.
fn repair(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    let slice = &text[start..=end];

    if let Ok(value) = serde_json::from_str(slice) {
        return Some(value);
    }

    serde_json::from_str(&remove_trailing_commas(slice)).ok()
}

/// Drop commas that are followed only by whitespace before a closing `]`
/// or `}`, outside string literals.
fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().copied().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}
