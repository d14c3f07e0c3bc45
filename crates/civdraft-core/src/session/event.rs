//! Session events and the outbound notification contract.

use super::phase::GamePhase;
use crate::resolve::ResolvedSetting;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// High-level events the engine emits for the presentation layer.
///
/// Emission is fire-and-forget: delivery failure never rolls back the state
/// transition that produced the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session moved to a later phase.
    PhaseAdvanced {
        session_id: String,
        from: GamePhase,
        to: GamePhase,
    },
    /// Voting finished and the ruleset was drawn.
    ResolutionComputed {
        session_id: String,
        settings: BTreeMap<String, ResolvedSetting>,
    },
    /// Pool allocation could not proceed; the session is stalled in its
    /// current phase until an administrator intervenes.
    AllocationFailed { session_id: String, reason: String },
}

impl SessionEvent {
    /// The session this event belongs to.
    pub fn session_id(&self) -> &str {
        match self {
            SessionEvent::PhaseAdvanced { session_id, .. }
            | SessionEvent::ResolutionComputed { session_id, .. }
            | SessionEvent::AllocationFailed { session_id, .. } => session_id,
        }
    }
}

/// Outbound sink for [`SessionEvent`]s.
///
/// Implementations render or forward events; they must not fail the caller.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: SessionEvent);
}
