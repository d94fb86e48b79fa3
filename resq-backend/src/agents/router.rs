//! Supervisor router - classifies the transcript to pick the next participant

use crate::agents::graph::RouteSelector;
use crate::ai::{ChatMessage, GeminiClient, MessageRole};
use async_trait::async_trait;
use std::sync::Arc;

const SUPERVISOR_PROMPT: &str = include_str!("prompts/supervisor.md");

/// The routing outcome. Ephemeral: computed fresh each time control enters
/// the supervisor, never persisted into history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Triage,
    Logistics,
    Medical,
    Finish,
}

impl RouteDecision {
    /// Parse raw model output against the closed label set.
    ///
    /// The output is untrusted: quotes and periods are stripped anywhere in
    /// the string before comparison. Anything unrecognized is `None` and the
    /// caller decides the fallback.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = raw
            .trim()
            .replace('\'', "")
            .replace('"', "")
            .replace('.', "");
        match cleaned.trim() {
            "Triage" => Some(RouteDecision::Triage),
            "Logistics" => Some(RouteDecision::Logistics),
            "Medical" => Some(RouteDecision::Medical),
            "FINISH" => Some(RouteDecision::Finish),
            _ => None,
        }
    }
}

impl std::fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteDecision::Triage => write!(f, "Triage"),
            RouteDecision::Logistics => write!(f, "Logistics"),
            RouteDecision::Medical => write!(f, "Medical"),
            RouteDecision::Finish => write!(f, "FINISH"),
        }
    }
}

/// LLM-backed transcript classifier with a hard-coded safety bias: any
/// failure or unrecognized label escalates to Triage rather than stalling.
pub struct Router {
    client: Arc<GeminiClient>,
}

impl Router {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Router { client }
    }

    /// Render history as alternating `User:`/`AI:` lines. System messages
    /// are not part of the transcript the classifier sees.
    pub(crate) fn render_transcript(history: &[ChatMessage]) -> String {
        let mut transcript = String::new();
        for message in history {
            let line = message.content.normalized();
            match message.role {
                MessageRole::User => transcript.push_str(&format!("User: {}\n", line)),
                MessageRole::Assistant => transcript.push_str(&format!("AI: {}\n", line)),
                MessageRole::System => {}
            }
        }
        if transcript.is_empty() {
            transcript.push_str("User: Hello.\n");
        }
        transcript
    }

    pub async fn route(&self, history: &[ChatMessage]) -> RouteDecision {
        let transcript = Self::render_transcript(history);
        let prompt = format!(
            "{}\n\nHISTORY:\n{}\nOutput ONLY the next agent name.",
            SUPERVISOR_PROMPT, transcript
        );

        match self.client.generate_text(vec![ChatMessage::user(prompt)]).await {
            Ok(raw) => match RouteDecision::parse(&raw) {
                Some(decision) => decision,
                None => {
                    log::warn!(
                        "[ROUTER] Unrecognized label {:?}, escalating to Triage",
                        raw
                    );
                    RouteDecision::Triage
                }
            },
            Err(e) => {
                log::warn!("[ROUTER] Classification failed ({}), escalating to Triage", e);
                RouteDecision::Triage
            }
        }
    }
}

#[async_trait]
impl RouteSelector for Router {
    async fn select(&self, history: &[ChatMessage]) -> RouteDecision {
        self.route(history).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_clean_labels() {
        assert_eq!(RouteDecision::parse("Triage"), Some(RouteDecision::Triage));
        assert_eq!(
            RouteDecision::parse("Logistics"),
            Some(RouteDecision::Logistics)
        );
        assert_eq!(RouteDecision::parse("Medical"), Some(RouteDecision::Medical));
        assert_eq!(RouteDecision::parse("FINISH"), Some(RouteDecision::Finish));
    }

    #[test]
    fn test_parse_strips_quotes_and_periods() {
        assert_eq!(RouteDecision::parse("'Triage'"), Some(RouteDecision::Triage));
        assert_eq!(
            RouteDecision::parse(" \"Logistics\".  "),
            Some(RouteDecision::Logistics)
        );
        assert_eq!(RouteDecision::parse("FINISH."), Some(RouteDecision::Finish));
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        assert_eq!(RouteDecision::parse("triage"), None);
        assert_eq!(RouteDecision::parse("Finish"), None);
        assert_eq!(RouteDecision::parse("I think Triage is best"), None);
        assert_eq!(RouteDecision::parse(""), None);
    }

    #[test]
    fn test_transcript_rendering() {
        let history = vec![
            ChatMessage::user("I'm hurt"),
            ChatMessage::assistant("Where are you?"),
        ];
        let transcript = Router::render_transcript(&history);
        assert_eq!(transcript, "User: I'm hurt\nAI: Where are you?\n");
    }

    #[test]
    fn test_empty_transcript_uses_greeting_placeholder() {
        assert_eq!(Router::render_transcript(&[]), "User: Hello.\n");
    }
}
