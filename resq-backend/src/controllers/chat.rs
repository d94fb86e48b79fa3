use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::agents::graph::{TurnOutcome, TurnReport, STEP_LIMIT_WARNING};
use crate::ai::ChatMessage;
use crate::AppState;

/// Reported when a turn completes without any responder producing text.
const NO_RESPONSE_MESSAGE: &str = "⚠️ No response generated. Please try again.";

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub steps: usize,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/chat").route(web::post().to(post_chat)));
    cfg.service(web::resource("/api/chat/reset").route(web::post().to(reset_chat)));
}

async fn post_chat(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> impl Responder {
    let text = body.message.trim();
    if text.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Message must not be empty".to_string(),
        });
    }

    let session_id = state.sessions.get_or_create(body.session_id.as_deref());
    state
        .sessions
        .append(&session_id, ChatMessage::user(text));

    // Run the turn over a snapshot; the store lock is never held across await.
    let history = state.sessions.history(&session_id);
    log::info!(
        "[CHAT] Session {} turn with {} messages of history",
        session_id,
        history.len()
    );
    let report = state.graph.run_turn(history).await;

    state
        .sessions
        .extend(&session_id, report.appended_messages());

    let reply = build_reply(&report);

    HttpResponse::Ok().json(ChatResponse {
        session_id,
        reply,
        steps: report.steps.len(),
        completed: report.outcome == TurnOutcome::Completed,
    })
}

/// The reply surfaced to the user for one turn: the last responder text, the
/// no-response report when no node produced any, and the step-limit warning
/// appended when the turn was forcibly halted.
fn build_reply(report: &TurnReport) -> String {
    match report.outcome {
        TurnOutcome::Completed => report
            .final_reply()
            .unwrap_or_else(|| NO_RESPONSE_MESSAGE.to_string()),
        TurnOutcome::StepLimit => match report.final_reply() {
            Some(partial) => format!("{}\n\n{}", partial, STEP_LIMIT_WARNING),
            None => STEP_LIMIT_WARNING.to_string(),
        },
    }
}

async fn reset_chat(state: web::Data<AppState>, body: web::Json<ResetRequest>) -> impl Responder {
    if state.sessions.reset(&body.session_id) {
        HttpResponse::Ok().json(serde_json::json!({ "status": "reset" }))
    } else {
        HttpResponse::NotFound().json(ErrorResponse {
            error: "Unknown session".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::graph::{GraphNode, StepSnapshot};

    fn report(steps: Vec<StepSnapshot>, outcome: TurnOutcome) -> TurnReport {
        TurnReport { steps, outcome }
    }

    #[test]
    fn test_reply_is_last_responder_text() {
        let r = report(
            vec![
                StepSnapshot {
                    node: GraphNode::Supervisor,
                    messages: Vec::new(),
                },
                StepSnapshot {
                    node: GraphNode::Medical,
                    messages: vec![ChatMessage::assistant("apply pressure to the wound")],
                },
            ],
            TurnOutcome::Completed,
        );
        assert_eq!(build_reply(&r), "apply pressure to the wound");
    }

    #[test]
    fn test_completed_turn_without_text_reports_no_response() {
        // A responder can legitimately return an empty message (e.g. a model
        // reply with no content); that must surface as the fixed report.
        let r = report(
            vec![
                StepSnapshot {
                    node: GraphNode::Supervisor,
                    messages: Vec::new(),
                },
                StepSnapshot {
                    node: GraphNode::Triage,
                    messages: vec![ChatMessage::assistant("")],
                },
            ],
            TurnOutcome::Completed,
        );
        assert_eq!(build_reply(&r), NO_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_finish_only_turn_reports_no_response() {
        let r = report(
            vec![StepSnapshot {
                node: GraphNode::Supervisor,
                messages: Vec::new(),
            }],
            TurnOutcome::Completed,
        );
        assert_eq!(build_reply(&r), NO_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_step_limit_appends_warning_to_partial_reply() {
        let r = report(
            vec![StepSnapshot {
                node: GraphNode::Tools,
                messages: vec![ChatMessage::assistant("Incident logged successfully. ID: 7.")],
            }],
            TurnOutcome::StepLimit,
        );
        let reply = build_reply(&r);
        assert!(reply.starts_with("Incident logged successfully. ID: 7."));
        assert!(reply.ends_with(STEP_LIMIT_WARNING));
    }

    #[test]
    fn test_step_limit_without_text_is_warning_only() {
        let r = report(Vec::new(), TurnOutcome::StepLimit);
        assert_eq!(build_reply(&r), STEP_LIMIT_WARNING);
    }
}
