//! Dispatch graph - the routing/handoff state machine
//!
//! A cyclic graph of nodes: the supervisor picks a specialist, specialists
//! either answer (→ Terminal) or request tools (→ Tools), and every tool
//! step loops back through the supervisor for re-evaluation. The driving
//! loop owns a global step counter so the Tools → Supervisor cycle cannot
//! run away.

use crate::agents::router::RouteDecision;
use crate::ai::ChatMessage;
use crate::tools::{ToolContext, ToolRegistry};
use async_trait::async_trait;
use std::sync::Arc;

/// Hard ceiling on graph steps per turn.
pub const MAX_GRAPH_STEPS: usize = 10;

/// Warning surfaced to the user when a turn hits the step ceiling.
pub const STEP_LIMIT_WARNING: &str =
    "⚠️ Dispatch stopped after reaching the step limit for this turn. Progress so far has been kept.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphNode {
    Supervisor,
    Triage,
    Logistics,
    Medical,
    Tools,
    Terminal,
}

impl std::fmt::Display for GraphNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GraphNode::Supervisor => "Supervisor",
            GraphNode::Triage => "Triage",
            GraphNode::Logistics => "Logistics",
            GraphNode::Medical => "Medical",
            GraphNode::Tools => "Tools",
            GraphNode::Terminal => "Terminal",
        };
        write!(f, "{}", name)
    }
}

/// Picks the next participant from the transcript.
#[async_trait]
pub trait RouteSelector: Send + Sync {
    async fn select(&self, history: &[ChatMessage]) -> RouteDecision;
}

/// Produces one assistant message per step, possibly carrying tool calls.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, history: &[ChatMessage]) -> ChatMessage;
}

/// One completed node step: the node that ran and any messages it appended.
#[derive(Debug, Clone)]
pub struct StepSnapshot {
    pub node: GraphNode,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The graph reached Terminal.
    Completed,
    /// The step ceiling fired before Terminal was reached.
    StepLimit,
}

/// Everything one turn produced. History appends are replayed from the
/// snapshots; nothing already appended is ever discarded.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub steps: Vec<StepSnapshot>,
    pub outcome: TurnOutcome,
}

impl TurnReport {
    /// All messages this turn appended, in order.
    pub fn appended_messages(&self) -> Vec<ChatMessage> {
        self.steps
            .iter()
            .flat_map(|s| s.messages.iter().cloned())
            .collect()
    }

    /// The reply to surface: the last non-empty text a non-supervisor node
    /// produced. `None` means no node generated a response this turn.
    pub fn final_reply(&self) -> Option<String> {
        self.steps
            .iter()
            .rev()
            .filter(|s| s.node != GraphNode::Supervisor)
            .flat_map(|s| s.messages.iter().rev())
            .map(|m| m.content.normalized())
            .find(|text| !text.trim().is_empty())
    }
}

/// The state machine binding router, responders, and tool registry.
pub struct DispatchGraph {
    router: Arc<dyn RouteSelector>,
    triage: Arc<dyn Responder>,
    logistics: Arc<dyn Responder>,
    medical: Arc<dyn Responder>,
    tools: Arc<ToolRegistry>,
    tool_context: ToolContext,
}

impl DispatchGraph {
    pub fn new(
        router: Arc<dyn RouteSelector>,
        triage: Arc<dyn Responder>,
        logistics: Arc<dyn Responder>,
        medical: Arc<dyn Responder>,
        tools: Arc<ToolRegistry>,
        tool_context: ToolContext,
    ) -> Self {
        DispatchGraph {
            router,
            triage,
            logistics,
            medical,
            tools,
            tool_context,
        }
    }

    /// Run one turn over a snapshot of the session history. The working copy
    /// grows as nodes append; the caller replays the appends into the owning
    /// session from the returned report.
    pub async fn run_turn(&self, mut history: Vec<ChatMessage>) -> TurnReport {
        let mut steps: Vec<StepSnapshot> = Vec::new();
        let mut node = GraphNode::Supervisor;
        let mut step_count = 0usize;

        loop {
            if node == GraphNode::Terminal {
                return TurnReport {
                    steps,
                    outcome: TurnOutcome::Completed,
                };
            }

            if step_count >= MAX_GRAPH_STEPS {
                log::warn!(
                    "[GRAPH] Step ceiling ({}) hit, aborting turn",
                    MAX_GRAPH_STEPS
                );
                return TurnReport {
                    steps,
                    outcome: TurnOutcome::StepLimit,
                };
            }
            step_count += 1;

            node = match node {
                GraphNode::Supervisor => {
                    let decision = self.router.select(&history).await;
                    log::info!("[GRAPH] Supervisor routed to {}", decision);
                    steps.push(StepSnapshot {
                        node: GraphNode::Supervisor,
                        messages: Vec::new(),
                    });
                    match decision {
                        RouteDecision::Triage => GraphNode::Triage,
                        RouteDecision::Logistics => GraphNode::Logistics,
                        RouteDecision::Medical => GraphNode::Medical,
                        RouteDecision::Finish => GraphNode::Terminal,
                    }
                }

                GraphNode::Triage | GraphNode::Logistics => {
                    let responder = if node == GraphNode::Triage {
                        &self.triage
                    } else {
                        &self.logistics
                    };
                    let message = responder.respond(&history).await;
                    let wants_tools = message.has_tool_calls();
                    history.push(message.clone());
                    steps.push(StepSnapshot {
                        node,
                        messages: vec![message],
                    });
                    if wants_tools {
                        GraphNode::Tools
                    } else {
                        GraphNode::Terminal
                    }
                }

                GraphNode::Medical => {
                    // No tool path: medical always terminates the turn.
                    let message = self.medical.respond(&history).await;
                    history.push(message.clone());
                    steps.push(StepSnapshot {
                        node: GraphNode::Medical,
                        messages: vec![message],
                    });
                    GraphNode::Terminal
                }

                GraphNode::Tools => {
                    let calls = history
                        .last()
                        .map(|m| m.tool_calls.clone())
                        .unwrap_or_default();

                    let mut messages = Vec::new();
                    for call in calls {
                        let result = self
                            .tools
                            .execute(&call.name, call.arguments.clone(), &self.tool_context)
                            .await;
                        let message = ChatMessage::assistant(result.content);
                        history.push(message.clone());
                        messages.push(message);
                    }

                    steps.push(StepSnapshot {
                        node: GraphNode::Tools,
                        messages,
                    });
                    // Always re-evaluate after a side effect.
                    GraphNode::Supervisor
                }

                GraphNode::Terminal => unreachable!("terminal handled above"),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ToolCall;
    use crate::db::Database;
    use crate::tools::registry::Tool;
    use crate::tools::types::{ToolDefinition, ToolInputSchema, ToolResult};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct FixedRoute(RouteDecision);

    #[async_trait]
    impl RouteSelector for FixedRoute {
        async fn select(&self, _history: &[ChatMessage]) -> RouteDecision {
            self.0
        }
    }

    struct CountingResponder {
        reply: ChatMessage,
        calls: AtomicUsize,
    }

    impl CountingResponder {
        fn new(reply: ChatMessage) -> Self {
            CountingResponder {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Responder for CountingResponder {
        async fn respond(&self, _history: &[ChatMessage]) -> ChatMessage {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    struct PingTool;

    #[async_trait]
    impl Tool for PingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "ping".to_string(),
                description: "test tool".to_string(),
                input_schema: ToolInputSchema::new(HashMap::new(), &[]),
            }
        }

        async fn execute(&self, _params: Value, _context: &ToolContext) -> ToolResult {
            ToolResult::success("pong")
        }
    }

    fn pinging_message() -> ChatMessage {
        ChatMessage {
            role: crate::ai::MessageRole::Assistant,
            content: "calling tool".into(),
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: "ping".to_string(),
                arguments: json!({}),
            }],
        }
    }

    fn test_graph(
        route: RouteDecision,
        triage_reply: ChatMessage,
    ) -> (tempfile::TempDir, DispatchGraph, Arc<CountingResponder>) {
        let dir = tempdir().unwrap();
        let db = Arc::new(Database::new(dir.path().join("t.db").to_str().unwrap()).unwrap());

        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(PingTool));

        let triage = Arc::new(CountingResponder::new(triage_reply));
        let graph = DispatchGraph::new(
            Arc::new(FixedRoute(route)),
            triage.clone(),
            Arc::new(CountingResponder::new(ChatMessage::assistant("logistics"))),
            Arc::new(CountingResponder::new(ChatMessage::assistant("medical"))),
            Arc::new(registry),
            ToolContext::new(db),
        );
        (dir, graph, triage)
    }

    #[tokio::test]
    async fn test_finish_goes_straight_to_terminal() {
        let (_dir, graph, triage) =
            test_graph(RouteDecision::Finish, ChatMessage::assistant("unused"));

        let report = graph.run_turn(vec![ChatMessage::user("thanks, bye")]).await;

        assert_eq!(report.outcome, TurnOutcome::Completed);
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].node, GraphNode::Supervisor);
        assert!(report.appended_messages().is_empty());
        assert_eq!(report.final_reply(), None);
        assert_eq!(triage.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_plain_answer_terminates_after_one_specialist_step() {
        let (_dir, graph, triage) = test_graph(
            RouteDecision::Triage,
            ChatMessage::assistant("stay calm, help is coming"),
        );

        let report = graph.run_turn(vec![ChatMessage::user("I'm trapped")]).await;

        assert_eq!(report.outcome, TurnOutcome::Completed);
        assert_eq!(triage.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            report.final_reply().as_deref(),
            Some("stay calm, help is coming")
        );
    }

    #[tokio::test]
    async fn test_medical_is_terminal_even_with_tool_calls_absent() {
        let (_dir, graph, _) = test_graph(
            RouteDecision::Medical,
            ChatMessage::assistant("unused"),
        );

        let report = graph
            .run_turn(vec![ChatMessage::user("how do I treat a burn?")])
            .await;

        assert_eq!(report.outcome, TurnOutcome::Completed);
        // Supervisor + Medical
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.final_reply().as_deref(), Some("medical"));
    }

    #[tokio::test]
    async fn test_runaway_cycle_halts_at_step_ceiling() {
        // Router always says Triage, triage always requests a tool: the
        // Supervisor → Triage → Tools cycle would never terminate on its own.
        let (_dir, graph, triage) = test_graph(RouteDecision::Triage, pinging_message());

        let report = graph.run_turn(vec![ChatMessage::user("loop")]).await;

        assert_eq!(report.outcome, TurnOutcome::StepLimit);
        assert_eq!(report.steps.len(), MAX_GRAPH_STEPS);
        // Steps: S T Tools S T Tools S T Tools S → 4 supervisor, 3 triage, 3 tools
        assert_eq!(triage.calls.load(Ordering::SeqCst), 3);
        // Appended history survives the abort.
        assert_eq!(report.appended_messages().len(), 6);
        assert_eq!(report.final_reply().as_deref(), Some("pong"));
    }

    #[tokio::test]
    async fn test_tool_result_loops_back_through_supervisor() {
        struct OneShotRoute {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl RouteSelector for OneShotRoute {
            async fn select(&self, _history: &[ChatMessage]) -> RouteDecision {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    RouteDecision::Triage
                } else {
                    RouteDecision::Finish
                }
            }
        }

        struct OneShotResponder {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl Responder for OneShotResponder {
            async fn respond(&self, _history: &[ChatMessage]) -> ChatMessage {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    pinging_message()
                } else {
                    ChatMessage::assistant("logged")
                }
            }
        }

        let dir = tempdir().unwrap();
        let db = Arc::new(Database::new(dir.path().join("t.db").to_str().unwrap()).unwrap());
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(PingTool));

        let graph = DispatchGraph::new(
            Arc::new(OneShotRoute {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(OneShotResponder {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(CountingResponder::new(ChatMessage::assistant("unused"))),
            Arc::new(CountingResponder::new(ChatMessage::assistant("unused"))),
            Arc::new(registry),
            ToolContext::new(db),
        );

        let report = graph.run_turn(vec![ChatMessage::user("dog bite")]).await;

        assert_eq!(report.outcome, TurnOutcome::Completed);
        // Supervisor, Triage, Tools, Supervisor (Finish)
        assert_eq!(report.steps.len(), 4);
        assert_eq!(report.steps[2].node, GraphNode::Tools);
        assert_eq!(report.final_reply().as_deref(), Some("pong"));
    }
}
