//! JSON-file-backed SessionRepository implementation.
//!
//! Stores each session as an individual JSON file in a sessions directory,
//! written atomically (tmp + fsync + rename) so a crashed write never leaves
//! a torn record behind.

use crate::paths::CivdraftPaths;
use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use civdraft_core::error::{DraftError, Result};
use civdraft_core::session::{Session, SessionRepository};
use std::fs;
use std::path::{Path, PathBuf};

/// A repository storing sessions as JSON files.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── sessions/
///     ├── a1b2c3d4.json
///     └── e5f6a7b8.json
/// ```
pub struct JsonDirSessionRepository {
    sessions_dir: PathBuf,
}

impl JsonDirSessionRepository {
    /// Creates a new repository rooted at `base_dir`.
    ///
    /// The `sessions/` subdirectory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory structure cannot be created.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let sessions_dir = base_dir.as_ref().join("sessions");
        fs::create_dir_all(&sessions_dir)?;
        Ok(Self { sessions_dir })
    }

    /// Creates a repository at the default per-user location.
    pub fn default_location() -> Result<Self> {
        let base_dir = CivdraftPaths::config_dir()
            .map_err(|e| DraftError::io(e.to_string()))?;
        Self::new(base_dir)
    }

    /// The directory session files live in.
    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn session_file(&self, session_id: &str) -> AtomicJsonFile<Session> {
        AtomicJsonFile::new(self.sessions_dir.join(format!("{session_id}.json")))
    }
}

#[async_trait]
impl SessionRepository for JsonDirSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        self.session_file(session_id).load()
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.session_file(&session.id).save(session)?;
        tracing::debug!(session = %session.id, "session persisted");
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        if self.session_file(session_id).delete()? {
            Ok(())
        } else {
            Err(DraftError::not_found("session", session_id))
        }
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();

        for entry in fs::read_dir(&self.sessions_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match AtomicJsonFile::<Session>::new(path.clone()).load() {
                Ok(Some(session)) => sessions.push(session),
                Ok(None) => {}
                Err(e) => {
                    // Skip unreadable records rather than failing the listing.
                    tracing::warn!(?path, error = %e, "failed to load session file");
                }
            }
        }

        // Most recently updated first.
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }
}
