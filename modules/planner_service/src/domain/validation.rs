//! Input validation helpers

use crate::contract::PlannerError;

pub const MAX_TITLE_LENGTH: usize = 200;
const MAX_TAG_LENGTH: usize = 40;

/// Trimmed, non-empty title of at most 200 characters
pub fn validate_title(title: &str, what: &str) -> Result<String, PlannerError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PlannerError::validation(format!("{} title is required", what)));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(PlannerError::validation(format!(
            "{} title must be at most {} characters",
            what, MAX_TITLE_LENGTH
        )));
    }
    Ok(title.to_string())
}

/// Blank text becomes `None`
pub fn normalize_text(text: Option<String>, max_len: usize) -> Result<Option<String>, PlannerError> {
    match text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        Some(t) if t.chars().count() > max_len => Err(PlannerError::validation(format!(
            "text must be at most {} characters",
            max_len
        ))),
        other => Ok(other),
    }
}

/// Trim, lowercase and dedupe tags, preserving first-seen order
pub fn normalize_tags(tags: Vec<String>, max_tags: usize) -> Result<Vec<String>, PlannerError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(PlannerError::validation(format!(
                "tag '{}' is longer than {} characters",
                tag, MAX_TAG_LENGTH
            )));
        }
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    if out.len() > max_tags {
        return Err(PlannerError::validation(format!("at most {} tags are allowed", max_tags)));
    }
    Ok(out)
}

/// Case-insensitive substring match
pub fn matches_search(needle: &str, haystacks: &[Option<&str>]) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    haystacks
        .iter()
        .flatten()
        .any(|h| h.to_lowercase().contains(&needle))
}
