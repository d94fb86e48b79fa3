//! In-memory chat sessions
//!
//! One session per conversation, owning its append-only message history.
//! Sessions live for the duration of the process; an explicit reset clears
//! the history without changing the session id.

use crate::ai::ChatMessage;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl ChatSession {
    fn new(id: String) -> Self {
        let now = Utc::now();
        ChatSession {
            id,
            messages: Vec::new(),
            created_at: now,
            last_activity_at: now,
        }
    }
}

/// Thread-safe store of active sessions, keyed by session id.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, ChatSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a session by id, creating a fresh one when the id is missing
    /// or unknown. Returns the effective session id.
    pub fn get_or_create(&self, session_id: Option<&str>) -> String {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(id) = session_id {
            if sessions.contains_key(id) {
                return id.to_string();
            }
        }
        let id = Uuid::new_v4().to_string();
        sessions.insert(id.clone(), ChatSession::new(id.clone()));
        id
    }

    /// Append one message to a session's history.
    pub fn append(&self, session_id: &str, message: ChatMessage) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(session_id) {
            session.messages.push(message);
            session.last_activity_at = Utc::now();
        }
    }

    /// Append a batch of messages produced by one graph turn.
    pub fn extend(&self, session_id: &str, messages: Vec<ChatMessage>) {
        if messages.is_empty() {
            return;
        }
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(session_id) {
            session.messages.extend(messages);
            session.last_activity_at = Utc::now();
        }
    }

    /// Snapshot of a session's history for a graph run.
    pub fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        let sessions = self.sessions.lock().unwrap();
        sessions
            .get(session_id)
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    /// Clear a session's history. Returns false for an unknown id.
    pub fn reset(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.messages.clear();
                session.last_activity_at = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
