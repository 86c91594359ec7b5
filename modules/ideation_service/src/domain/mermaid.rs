//! Mermaid source handling

use crate::contract::DiagramKind;
use once_cell::sync::Lazy;
use regex::Regex;

// Literal patterns; compiling them cannot fail
#[allow(clippy::expect_used)]
static MERMAID_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[ \t]*mermaid[ \t]*\r?\n(.*?)```").expect("valid regex"));

#[allow(clippy::expect_used)]
static ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[^\n]*\r?\n(.*?)```").expect("valid regex"));

/// Diagram source out of a model reply.
///
/// A ```mermaid fence wins, then any fence, then the whole reply.
pub fn extract_source(reply: &str) -> String {
    MERMAID_FENCE
        .captures(reply)
        .or_else(|| ANY_FENCE.captures(reply))
        .and_then(|c| c.get(1))
        .map_or(reply, |m| m.as_str())
        .trim()
        .to_string()
}

/// First line that is neither blank nor a `%%` comment
fn header_line(source: &str) -> Option<&str> {
    source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("%%"))
}

/// Check that `source` declares the diagram type of `kind`
pub fn check_header(kind: DiagramKind, source: &str) -> Result<(), String> {
    let Some(line) = header_line(source) else {
        return Err("diagram source is empty".to_string());
    };
    let keyword = line.split_whitespace().next().unwrap_or_default();
    if kind.header_keywords().contains(&keyword) {
        Ok(())
    } else {
        Err(format!(
            "a {} diagram must start with '{}', found '{}'",
            kind.as_str(),
            kind.header_keywords().join("' or '"),
            keyword
        ))
    }
}
