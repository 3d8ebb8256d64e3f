//! Transport-agnostic application state.
//!
//! `CoreState` holds the in-memory session registry and the shared model
//! client. Sessions live only in this map; nothing is written to disk, so
//! dropping a session (or stopping the process) destroys the conversation,
//! the technical records, and any compiled report.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use uuid::Uuid;

use crate::pipeline::gemini::LlmChat;
use crate::pipeline::session::TriageSession;

/// A registered session behind its own lock. Holding the lock across the
/// model round trip is the per-session busy gate: overlapping submits queue
/// and run in arrival order.
pub type SessionHandle = Arc<tokio::sync::Mutex<TriageSession>>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("state lock poisoned")]
    LockPoisoned,
}

/// Shared by all request handlers; wrapped in `Arc` at startup.
///
/// The registry lock is a std `RwLock` held only for map access, never
/// across an await.
pub struct CoreState {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    pub llm: Arc<dyn LlmChat>,
    pub model: String,
}

impl CoreState {
    pub fn new(llm: Arc<dyn LlmChat>, model: String) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            llm,
            model,
        }
    }

    /// Open a new triage session and return its handle.
    pub fn create_session(&self) -> Result<SessionHandle, CoreError> {
        let session = TriageSession::new();
        let id = session.id;
        let handle = Arc::new(tokio::sync::Mutex::new(session));
        self.sessions
            .write()
            .map_err(|_| CoreError::LockPoisoned)?
            .insert(id, handle.clone());
        Ok(handle)
    }

    /// Look up an existing session.
    pub fn session(&self, id: Uuid) -> Result<SessionHandle, CoreError> {
        self.sessions
            .read()
            .map_err(|_| CoreError::LockPoisoned)?
            .get(&id)
            .cloned()
            .ok_or(CoreError::SessionNotFound(id))
    }

    /// Remove a session, destroying all of its data. Returns whether it
    /// existed.
    pub fn remove_session(&self, id: Uuid) -> Result<bool, CoreError> {
        Ok(self
            .sessions
            .write()
            .map_err(|_| CoreError::LockPoisoned)?
            .remove(&id)
            .is_some())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|m| m.len()).unwrap_or(0)
    }
}
