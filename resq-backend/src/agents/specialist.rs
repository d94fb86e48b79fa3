//! Specialist responders - three role-scoped variants of one pattern

use crate::agents::graph::Responder;
use crate::ai::{AiResponse, ChatMessage, GeminiClient, MessageContent, MessageRole};
use crate::tools::{ToolDefinition, ToolRegistry};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialistKind {
    Triage,
    Logistics,
    Medical,
}

impl SpecialistKind {
    pub fn label(&self) -> &'static str {
        match self {
            SpecialistKind::Triage => "TRIAGE",
            SpecialistKind::Logistics => "LOGISTICS",
            SpecialistKind::Medical => "MEDICAL",
        }
    }

    fn role_prompt(&self) -> &'static str {
        match self {
            SpecialistKind::Triage => include_str!("prompts/triage.md"),
            SpecialistKind::Logistics => include_str!("prompts/logistics.md"),
            SpecialistKind::Medical => include_str!("prompts/medical.md"),
        }
    }

    /// Synthetic user message substituted when the history is empty, so the
    /// responder always has something to react to.
    fn placeholder_text(&self) -> &'static str {
        match self {
            SpecialistKind::Triage => "User reported an incident. Please ask for details.",
            SpecialistKind::Logistics => "User needs logistics assistance.",
            SpecialistKind::Medical => "User needs medical advice.",
        }
    }

    /// Fixed warning substituted when the model call fails.
    pub fn fallback_warning(&self) -> &'static str {
        match self {
            SpecialistKind::Triage => {
                "⚠️ Triage system encountered an error. Please try rephrasing your request."
            }
            SpecialistKind::Logistics => {
                "⚠️ Logistics system encountered an error. Please try again."
            }
            SpecialistKind::Medical => "⚠️ Medical system encountered an error. Please try again.",
        }
    }

    /// Names of the registered tools this role may invoke.
    pub fn tool_names(&self) -> &'static [&'static str] {
        match self {
            SpecialistKind::Triage => &["log_incident"],
            SpecialistKind::Logistics => &["check_inventory", "search_shelters"],
            SpecialistKind::Medical => &[],
        }
    }
}

/// Build the message batch sent to the model for one responder step.
///
/// The backend rejects several message shapes, so the batch is massaged in a
/// fixed order: placeholder for empty history, content normalization, system
/// message removal (with re-placeholder), role prompt injected as a prefix on
/// the first user message, and a guaranteed user-authored turn.
pub(crate) fn prepare_batch(kind: SpecialistKind, history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut batch: Vec<ChatMessage> = if history.is_empty() {
        vec![ChatMessage::user(kind.placeholder_text())]
    } else {
        history.iter().map(|m| m.normalized()).collect()
    };

    batch.retain(|m| m.role != MessageRole::System);
    if batch.is_empty() {
        batch.push(ChatMessage::user("User needs assistance. Please respond."));
    }

    // The backend rejects a leading instruction turn, so the role prompt
    // rides inside the first user message instead.
    if batch[0].role == MessageRole::User {
        let original = batch[0].content.normalized();
        batch[0].content = MessageContent::Text(format!(
            "[System Context: {}]\n\nUser: {}",
            kind.role_prompt().trim(),
            original
        ));
    }

    if !batch.iter().any(|m| m.role == MessageRole::User) {
        batch.push(ChatMessage::user("Hello, I need assistance."));
    }

    batch
}

/// A role-scoped responder. Produces exactly one assistant message per step,
/// either free text or text plus tool-call requests.
pub struct Specialist {
    kind: SpecialistKind,
    client: Arc<GeminiClient>,
    tools: Vec<ToolDefinition>,
}

impl Specialist {
    pub fn new(kind: SpecialistKind, client: Arc<GeminiClient>, registry: &ToolRegistry) -> Self {
        Specialist {
            kind,
            client,
            tools: registry.definitions_for(kind.tool_names()),
        }
    }

    pub fn kind(&self) -> SpecialistKind {
        self.kind
    }
}

#[async_trait]
impl Responder for Specialist {
    async fn respond(&self, history: &[ChatMessage]) -> ChatMessage {
        let batch = prepare_batch(self.kind, history);

        let result = if self.tools.is_empty() {
            self.client.generate_text(batch).await.map(|content| AiResponse {
                content,
                tool_calls: Vec::new(),
            })
        } else {
            self.client
                .generate_with_tools(batch, self.tools.clone())
                .await
        };

        match result {
            Ok(response) => ChatMessage {
                role: MessageRole::Assistant,
                content: MessageContent::Text(response.content),
                tool_calls: response.tool_calls,
            }
            .normalized(),
            Err(e) => {
                log::error!("[{}] Model call failed: {}", self.kind.label(), e);
                ChatMessage::assistant(self.kind.fallback_warning())
            }
        }
    }
}
