//! Input validation helpers

use crate::contract::IdeationError;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_TOPIC_LENGTH: usize = 2_000;
pub const MAX_IDEA_LENGTH: usize = 1_000;
pub const MAX_PROMPT_LENGTH: usize = 4_000;
pub const MAX_GENERATED_IDEAS: usize = 10;
pub const MAX_SPRINT_CAPACITY: usize = 50;

/// Trimmed, non-empty text of at most `max_len` characters
pub fn required_text(text: &str, what: &str, max_len: usize) -> Result<String, IdeationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(IdeationError::validation(format!("{} is required", what)));
    }
    if text.chars().count() > max_len {
        return Err(IdeationError::validation(format!(
            "{} must be at most {} characters",
            what, max_len
        )));
    }
    Ok(text.to_string())
}

pub fn validate_title(title: &str) -> Result<String, IdeationError> {
    required_text(title, "title", MAX_TITLE_LENGTH)
}

pub fn validate_idea_count(count: usize) -> Result<usize, IdeationError> {
    if !(1..=MAX_GENERATED_IDEAS).contains(&count) {
        return Err(IdeationError::validation(format!(
            "count must be between 1 and {}",
            MAX_GENERATED_IDEAS
        )));
    }
    Ok(count)
}

pub fn validate_capacity(capacity: usize) -> Result<usize, IdeationError> {
    if !(1..=MAX_SPRINT_CAPACITY).contains(&capacity) {
        return Err(IdeationError::validation(format!(
            "capacity must be between 1 and {}",
            MAX_SPRINT_CAPACITY
        )));
    }
    Ok(capacity)
}

/// Cut to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
