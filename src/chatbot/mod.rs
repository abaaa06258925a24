//! Chatbot types and the keyword intent classifier used in mock mode.

pub mod rules;

use serde::{Deserialize, Serialize};

pub use rules::IntentRules;

/// What the classifier (or the live chatbot service) decided the user wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Help,
    Add,
    List,
    Complete,
    Delete,
    Unknown,
}

/// One chatbot reply: the text to render, the resolved intent, an optional
/// structured payload (e.g. the stub task an `add` created), and ordered
/// quick-reply suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatbotResponse {
    pub message: String,
    pub intent: Intent,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Intent::Help).unwrap(), "\"help\"");
        let parsed: Intent = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(parsed, Intent::Unknown);
    }

    #[test]
    fn response_omits_absent_data() {
        let response = ChatbotResponse {
            message: "ok".into(),
            intent: Intent::List,
            success: true,
            data: None,
            suggestions: vec!["Help".into()],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("\"data\""));
        assert!(json.contains("\"suggestions\""));
    }

    #[test]
    fn response_round_trips_with_data() {
        let response = ChatbotResponse {
            message: "created".into(),
            intent: Intent::Add,
            success: true,
            data: Some(serde_json::json!({"id": "1", "title": "T", "completed": false})),
            suggestions: vec![],
        };
        let json = serde_json::to_string(&response).unwrap();
        let parsed: ChatbotResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
    }
}
