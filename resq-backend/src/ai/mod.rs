//! Message types and model client shared by the router and specialists.

pub mod gemini;

pub use gemini::GeminiClient;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One part of a structured content payload. Some model backends return
/// content as a list of fragments instead of a single string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentFragment {
    Text { text: String },
    Other(Value),
}

/// Message content, either plain text or a list of fragments.
///
/// Every consumer reduces this to plain text via [`MessageContent::normalized`]
/// before branching on roles, so the structured form never leaks past the
/// message layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Fragments(Vec<ContentFragment>),
}

impl MessageContent {
    /// Collapse to a single flat string. Text fragments are joined with
    /// spaces; non-text fragments are stringified.
    pub fn normalized(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Fragments(parts) => {
                let mut pieces: Vec<String> = Vec::with_capacity(parts.len());
                for part in parts {
                    match part {
                        ContentFragment::Text { text } => pieces.push(text.clone()),
                        ContentFragment::Other(Value::String(s)) => pieces.push(s.clone()),
                        ContentFragment::Other(v) => pieces.push(v.to_string()),
                    }
                }
                pieces.join(" ").trim().to_string()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized().trim().is_empty()
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

/// A structured tool invocation request emitted by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// One message in a conversation. `tool_calls` is only ever non-empty on
/// assistant messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage {
            role: MessageRole::User,
            content: MessageContent::Text(text.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        ChatMessage {
            role: MessageRole::Assistant,
            content: MessageContent::Text(text.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Return a copy with content collapsed to plain text.
    pub fn normalized(&self) -> Self {
        ChatMessage {
            role: self.role,
            content: MessageContent::Text(self.content.normalized()),
            tool_calls: self.tool_calls.clone(),
        }
    }
}

/// Parsed model response: free text plus zero or more tool calls.
#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_plain_text() {
        let content = MessageContent::Text("hello".to_string());
        assert_eq!(content.normalized(), "hello");
    }

    #[test]
    fn test_normalize_mixed_fragments() {
        let content = MessageContent::Fragments(vec![
            ContentFragment::Text {
                text: "first".to_string(),
            },
            ContentFragment::Other(json!("second")),
            ContentFragment::Other(json!({"kind": "blob"})),
        ]);
        let flat = content.normalized();
        assert!(flat.starts_with("first second"));
        assert!(flat.contains("blob"));
    }

    #[test]
    fn test_fragments_deserialize_from_list() {
        let raw = json!([{"text": "part one"}, "part two"]);
        let content: MessageContent = serde_json::from_value(raw).unwrap();
        assert_eq!(content.normalized(), "part one part two");
    }

    #[test]
    fn test_empty_fragment_list_is_empty() {
        let content = MessageContent::Fragments(vec![]);
        assert!(content.is_empty());
    }
}
