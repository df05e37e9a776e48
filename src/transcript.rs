use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Turn {
            role,
            content: content.into(),
        }
    }
}

/// Ordered conversation history for one session. Starts with a single system
/// turn and grows by user/assistant pairs; never pruned or persisted.
#[derive(Debug)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new(system_prompt: &str) -> Self {
        Transcript {
            turns: vec![Turn::new(Role::System, system_prompt)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::new(Role::Assistant, content));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

pub type SharedTranscript = Arc<Mutex<Transcript>>;

/// Transcripts keyed by caller-chosen session id. Requests that omit the id
/// share the `DEFAULT_SESSION` transcript. Each transcript sits behind its own
/// async mutex, held for the whole append/call/append sequence of a request,
/// so turns from concurrent requests on one session cannot interleave.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SharedTranscript>>,
    system_prompt: Arc<str>,
}

impl SessionStore {
    pub fn new(system_prompt: &str) -> Self {
        SessionStore {
            sessions: Arc::new(DashMap::new()),
            system_prompt: Arc::from(system_prompt),
        }
    }

    pub fn get_or_create(&self, session_id: Option<&str>) -> SharedTranscript {
        let key = session_id.unwrap_or(DEFAULT_SESSION);
        self.sessions
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Transcript::new(&self.system_prompt))))
            .clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_starts_with_system_turn() {
        let t = Transcript::new("be brief");
        assert_eq!(t.len(), 1);
        assert_eq!(t.turns()[0].role, Role::System);
        assert_eq!(t.turns()[0].content, "be brief");
    }

    #[test]
    fn turns_alternate_after_system() {
        let mut t = Transcript::new("sys");
        t.push_user("hi");
        t.push_assistant("hello");
        t.push_user("bye");
        t.push_assistant("goodbye");
        for pair in t.turns()[1..].chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
        }
    }

    #[tokio::test]
    async fn store_shares_default_session() {
        let store = SessionStore::new("sys");
        let a = store.get_or_create(None);
        let b = store.get_or_create(None);
        a.lock().await.push_user("hi");
        assert_eq!(b.lock().await.len(), 2);
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn store_isolates_named_sessions() {
        let store = SessionStore::new("sys");
        let a = store.get_or_create(Some("alice"));
        let b = store.get_or_create(Some("bob"));
        a.lock().await.push_user("hi");
        assert_eq!(a.lock().await.len(), 2);
        assert_eq!(b.lock().await.len(), 1);
        assert_eq!(store.session_count(), 2);
    }
}
