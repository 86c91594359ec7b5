//! Prompts sent to the AI gateway and parsers for the replies

use super::validation::{truncate_chars, MAX_IDEA_LENGTH};
use crate::contract::{BrainstormSession, DiagramKind};
use ai_gateway::{ChatMessage, ChatRequest};
use once_cell::sync::Lazy;
use planner_service::Task;
use regex::Regex;
use std::collections::HashSet;
use uuid::Uuid;

// Literal patterns; compiling them cannot fail
#[allow(clippy::expect_used)]
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*•+]|\(?\d{1,3}[.):]|[a-zA-Z][.)])\s+").expect("valid regex"));

#[allow(clippy::expect_used)]
static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("valid regex")
});

/// Ideas quoted back to the model in prompts
const MAX_IDEAS_IN_PROMPT: usize = 50;

fn existing_ideas(session: &BrainstormSession) -> String {
    if session.ideas.is_empty() {
        return "(none yet)".to_string();
    }
    let mut ideas: Vec<_> = session.ideas.iter().collect();
    ideas.sort_by(|a, b| b.votes().cmp(&a.votes()));
    ideas
        .iter()
        .take(MAX_IDEAS_IN_PROMPT)
        .map(|i| format!("- {} ({} votes)", i.text, i.votes()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn idea_request(session: &BrainstormSession, count: usize, temperature: f32, max_tokens: u32) -> ChatRequest {
    ChatRequest {
        model: None,
        messages: vec![
            ChatMessage::system(
                "You are a brainstorming partner for a product team. Reply with one idea per \
                 line, no numbering, no introduction and no closing remarks. Keep each idea \
                 under 200 characters.",
            ),
            ChatMessage::user(format!(
                "Session: {}\nTopic: {}\n\nIdeas so far:\n{}\n\nSuggest {} new ideas that are \
                 different from the ones above.",
                session.title,
                session.topic,
                existing_ideas(session),
                count
            )),
        ],
        temperature: Some(temperature),
        max_tokens: Some(max_tokens),
    }
}

/// One idea per line; list markers, quotes and headings are dropped and
/// ideas already in the session are skipped
pub fn parse_ideas(reply: &str, session: &BrainstormSession, count: usize) -> Vec<String> {
    let mut seen: HashSet<String> = session.ideas.iter().map(|i| i.text.to_lowercase()).collect();
    let mut ideas = Vec::new();

    for line in reply.lines() {
        let line = LIST_MARKER.replace(line.trim(), "");
        let line = line
            .trim()
            .trim_matches(|c| c == '"' || c == '*' || c == '`')
            .trim();
        if line.is_empty() || line.ends_with(':') {
            continue;
        }

        let idea = truncate_chars(line, MAX_IDEA_LENGTH);
        if seen.insert(idea.to_lowercase()) {
            ideas.push(idea);
        }
        if ideas.len() == count {
            break;
        }
    }
    ideas
}

pub fn summary_request(session: &BrainstormSession, max_tokens: u32) -> ChatRequest {
    ChatRequest {
        model: None,
        messages: vec![
            ChatMessage::system(
                "You summarize brainstorming sessions for a product team. Group related ideas, \
                 call out the most voted ones and end with two or three suggested next steps.",
            ),
            ChatMessage::user(format!(
                "Session: {}\nTopic: {}\n\nIdeas:\n{}",
                session.title,
                session.topic,
                existing_ideas(session)
            )),
        ],
        temperature: Some(0.3),
        max_tokens: Some(max_tokens),
    }
}

pub fn diagram_request(kind: DiagramKind, prompt: &str, max_tokens: u32) -> ChatRequest {
    let header = kind.header_keywords().first().copied().unwrap_or("flowchart");
    ChatRequest {
        model: None,
        messages: vec![
            ChatMessage::system(format!(
                "You write Mermaid diagrams. Answer with a single ```mermaid code block and \
                 nothing else. The diagram must start with '{}'.",
                header
            )),
            ChatMessage::user(prompt.to_string()),
        ],
        temperature: Some(0.2),
        max_tokens: Some(max_tokens),
    }
}

pub fn sprint_request(goal: &str, capacity: usize, backlog: &[Task], max_tokens: u32) -> ChatRequest {
    let tasks = backlog
        .iter()
        .map(|t| {
            format!(
                "- {} | {} | {}{}",
                t.id,
                t.priority.as_str(),
                t.title,
                t.due_date.map(|d| format!(" | due {}", d)).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    ChatRequest {
        model: None,
        messages: vec![
            ChatMessage::system(
                "You help a team plan its next sprint. Pick tasks from the backlog that best \
                 serve the sprint goal. List the chosen task ids first, one per line, most \
                 important first, then a short rationale.",
            ),
            ChatMessage::user(format!(
                "Sprint goal: {}\nPick at most {} tasks.\n\nBacklog (id | priority | title):\n{}",
                goal, capacity, tasks
            )),
        ],
        temperature: Some(0.2),
        max_tokens: Some(max_tokens),
    }
}

/// Backlog task ids mentioned in the reply, in order of first mention
pub fn parse_task_ids(reply: &str, backlog: &[Task], capacity: usize) -> Vec<Uuid> {
    let known: HashSet<Uuid> = backlog.iter().map(|t| t.id).collect();
    let mut picked = Vec::new();

    for m in UUID_PATTERN.find_iter(reply) {
        let Ok(id) = Uuid::parse_str(m.as_str()) else {
            continue;
        };
        if known.contains(&id) && !picked.contains(&id) {
            picked.push(id);
            if picked.len() == capacity {
                break;
            }
        }
    }
    picked
}
