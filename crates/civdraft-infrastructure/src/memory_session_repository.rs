//! In-memory SessionRepository implementation.
//!
//! Backs unit tests and embedded use where durability is not required. The
//! application service takes `Arc<dyn SessionRepository>`, so swapping this
//! in for the JSON-backed store needs no other change.

use async_trait::async_trait;
use civdraft_core::error::{DraftError, Result};
use civdraft_core::session::{Session, SessionRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A `HashMap`-backed session store with read-after-write consistency.
#[derive(Default)]
pub struct MemorySessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| DraftError::not_found("session", session_id))
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.values().cloned().collect())
    }
}
