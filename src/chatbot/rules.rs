//! Keyword rule table for classifying chat messages in mock mode.
//!
//! Rules are evaluated in a fixed priority order and the first match wins:
//! help, add, list, complete, delete, then the unknown fallback. A message
//! containing both "help" and "add" therefore resolves to help.

use chrono::Utc;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use crate::chatbot::{ChatbotResponse, Intent};

/// Title used when an add command carries no extractable title.
const DEFAULT_TASK_TITLE: &str = "New Task";

const HELP_MESSAGE: &str = "I can help you manage your tasks! Try these commands:\n\n\
**Add tasks:**\n\
- \"Add task: Buy groceries\"\n\
- \"Create: Review documents\"\n\n\
**View tasks:**\n\
- \"Show my tasks\"\n\
- \"Show pending tasks\"\n\n\
**Complete tasks:**\n\
- \"Complete: Buy groceries\"\n\n\
**Delete tasks:**\n\
- \"Delete: Old task\"";

/// A single classification rule: pattern → intent.
#[derive(Debug, Clone)]
struct IntentRule {
    /// Case-insensitive keyword pattern.
    matcher: Regex,
    /// Intent assigned when the pattern matches.
    intent: Intent,
}

/// Ordered intent rule table. Pure: no I/O, no shared state.
#[derive(Debug, Clone)]
pub struct IntentRules {
    rules: Vec<IntentRule>,
    /// Captures the task title after an add/create keyword and separator.
    title_pattern: Regex,
}

impl Default for IntentRules {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentRules {
    /// Build the default rule table. Order is the priority order.
    pub fn new() -> Self {
        let rules = vec![
            // "help" anywhere, or a bare "?"
            IntentRule {
                matcher: Regex::new(r"(?i)help|^\?$").expect("static pattern"),
                intent: Intent::Help,
            },
            IntentRule {
                matcher: Regex::new(r"(?i)add|create").expect("static pattern"),
                intent: Intent::Add,
            },
            IntentRule {
                matcher: Regex::new(r"(?i)show|list|my tasks").expect("static pattern"),
                intent: Intent::List,
            },
            IntentRule {
                matcher: Regex::new(r"(?i)complete|done").expect("static pattern"),
                intent: Intent::Complete,
            },
            IntentRule {
                matcher: Regex::new(r"(?i)delete|remove").expect("static pattern"),
                intent: Intent::Delete,
            },
        ];

        Self {
            rules,
            title_pattern: Regex::new(r"(?i)(?:add|create)(?:\s+task)?[:\s]+(.+)")
                .expect("static pattern"),
        }
    }

    /// Classify a raw chat message. First matching rule wins; anything that
    /// matches no rule is the unknown intent with `success = false`.
    pub fn classify(&self, message: &str) -> ChatbotResponse {
        for rule in &self.rules {
            if rule.matcher.is_match(message) {
                debug!(intent = ?rule.intent, "Chat message matched intent rule");
                return self.respond(rule.intent, message);
            }
        }

        debug!("Chat message matched no intent rule");
        ChatbotResponse {
            message: "I didn't understand that. Try 'Help' to see what I can do!".into(),
            intent: Intent::Unknown,
            success: false,
            data: None,
            suggestions: suggestions(&["Help", "Show my tasks", "Add task: "]),
        }
    }

    fn respond(&self, intent: Intent, message: &str) -> ChatbotResponse {
        match intent {
            Intent::Help => ChatbotResponse {
                message: HELP_MESSAGE.into(),
                intent,
                success: true,
                data: None,
                suggestions: suggestions(&["Show my tasks", "Add task: ", "Help"]),
            },
            Intent::Add => {
                let title = self.extract_title(message);
                ChatbotResponse {
                    message: format!("Task '{title}' created! (Mock mode)"),
                    intent,
                    success: true,
                    data: Some(json!({
                        "id": Utc::now().timestamp_millis().to_string(),
                        "title": title,
                        "completed": false,
                    })),
                    suggestions: suggestions(&["Show my tasks", "Add another task"]),
                }
            }
            Intent::List => ChatbotResponse {
                message: "In mock mode, tasks are managed locally. \
                          Check the Tasks page to see your tasks."
                    .into(),
                intent,
                success: true,
                data: None,
                suggestions: suggestions(&["Add task: ", "Help"]),
            },
            Intent::Complete => ChatbotResponse {
                message: "To complete a task in mock mode, use the checkbox on the Tasks page."
                    .into(),
                intent,
                success: true,
                data: None,
                suggestions: suggestions(&["Show my tasks", "Add task: "]),
            },
            Intent::Delete => ChatbotResponse {
                message: "To delete a task in mock mode, use the delete button on the Tasks page."
                    .into(),
                intent,
                success: true,
                data: None,
                suggestions: suggestions(&["Show my tasks", "Add task: "]),
            },
            Intent::Unknown => unreachable!("unknown is the fallback, never a rule"),
        }
    }

    /// Pull the task title out of an add/create command. Accepts an optional
    /// "task" keyword and a colon or whitespace separator.
    fn extract_title(&self, message: &str) -> String {
        self.title_pattern
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_TASK_TITLE.to_string())
    }
}

fn suggestions(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Classify with the default rule table.
pub fn classify(message: &str) -> ChatbotResponse {
    IntentRules::new().classify(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_keyword_anywhere() {
        let response = classify("I need some help with this");
        assert_eq!(response.intent, Intent::Help);
        assert!(response.success);
        assert!(response.message.contains("Add tasks"));
    }

    #[test]
    fn bare_question_mark_is_help() {
        assert_eq!(classify("?").intent, Intent::Help);
    }

    #[test]
    fn help_wins_over_add() {
        // "help" is checked before "add", so a message containing both
        // resolves to help.
        let response = classify("help me add a task");
        assert_eq!(response.intent, Intent::Help);
    }

    #[test]
    fn add_with_colon_extracts_title() {
        let response = classify("Add task: Buy milk");
        assert_eq!(response.intent, Intent::Add);
        assert!(response.success);
        assert!(response.message.contains("Buy milk"));
        let data = response.data.expect("add returns a stub task");
        assert_eq!(data["title"], "Buy milk");
        assert_eq!(data["completed"], false);
        assert!(data["id"].is_string());
    }

    #[test]
    fn create_with_colon_extracts_title() {
        let response = classify("Create: Review documents");
        assert_eq!(response.intent, Intent::Add);
        assert_eq!(response.data.unwrap()["title"], "Review documents");
    }

    #[test]
    fn add_with_whitespace_separator() {
        let response = classify("add buy groceries");
        assert_eq!(response.intent, Intent::Add);
        assert_eq!(response.data.unwrap()["title"], "buy groceries");
    }

    #[test]
    fn bare_add_defaults_title() {
        let response = classify("add");
        assert_eq!(response.intent, Intent::Add);
        assert_eq!(response.data.unwrap()["title"], "New Task");
    }

    #[test]
    fn list_variants() {
        assert_eq!(classify("show my tasks").intent, Intent::List);
        assert_eq!(classify("list everything").intent, Intent::List);
        assert_eq!(classify("my tasks").intent, Intent::List);
        assert!(classify("show my tasks").data.is_none());
    }

    #[test]
    fn complete_and_done() {
        assert_eq!(classify("complete: Buy milk").intent, Intent::Complete);
        assert_eq!(classify("mark it done").intent, Intent::Complete);
    }

    #[test]
    fn delete_and_remove() {
        assert_eq!(classify("delete: Old task").intent, Intent::Delete);
        assert_eq!(classify("remove that one").intent, Intent::Delete);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("DELETE old stuff").intent, Intent::Delete);
        assert_eq!(classify("HELP").intent, Intent::Help);
    }

    #[test]
    fn unrecognized_input_is_unknown() {
        let response = classify("xyz nonsense");
        assert_eq!(response.intent, Intent::Unknown);
        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(!response.suggestions.is_empty());
    }

    #[test]
    fn every_intent_carries_suggestions() {
        for input in ["help", "add: X", "show my tasks", "done", "remove it", "gibberish"] {
            assert!(
                !classify(input).suggestions.is_empty(),
                "no suggestions for {input:?}"
            );
        }
    }
}
