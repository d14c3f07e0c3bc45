//! Session domain model.
//!
//! This module contains the core Session entity that represents one
//! game-setup workflow in the engine's domain layer.

use super::phase::GamePhase;
use crate::resolve::ResolvedSetting;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Opaque identity of a participant (platform user id, tag, ...).
///
/// The engine never interprets its structure; it is only compared, ordered
/// and used as a map key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One full vote submission: category name → chosen option.
pub type VoteSheet = BTreeMap<String, String>;

/// Represents one game-setup session in the engine's domain layer.
///
/// A session contains:
/// - The creator identity, which authorizes privileged operations
/// - The ordered participant roster (insertion order = join order)
/// - The current phase and the per-phase submission maps
/// - The cached resolution result, computed exactly once
/// - Timestamps for creation and last update
///
/// This is the "pure" domain model that the phase machine operates on,
/// independent of any specific storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique short session identifier, assigned at creation
    pub id: String,
    /// Identity of the participant who created the session
    pub creator: ParticipantId,
    /// Participant identities in join order; frozen once voting starts
    #[serde(default)]
    pub participants: Vec<ParticipantId>,
    /// Current phase; monotonically advances, never regresses
    pub phase: GamePhase,
    /// Per-participant ban ceiling, fixed at creation
    pub max_bans: u32,
    /// Size of each participant's selection pool, fixed at creation
    pub pool_size: usize,
    /// Full vote sheets, one per participant that has voted
    #[serde(default)]
    pub votes: HashMap<ParticipantId, VoteSheet>,
    /// Weighted-random resolution result; written once, never re-drawn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_settings: Option<BTreeMap<String, ResolvedSetting>>,
    /// Submitted ban sets; presence (not size) signals a completed submission
    #[serde(default)]
    pub bans: HashMap<ParticipantId, BTreeSet<String>>,
    /// Assigned selection pools, disjoint across participants
    #[serde(default)]
    pub pools: HashMap<ParticipantId, Vec<String>>,
    /// Finalized selections, one item per participant
    #[serde(default)]
    pub selections: HashMap<ParticipantId, String>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl Session {
    /// Creates a fresh session in the Lobby phase.
    ///
    /// The id is a short unique token (truncated UUID v4). Configuration
    /// bounds are validated by the caller before construction.
    pub fn new(creator: ParticipantId, max_bans: u32, pool_size: usize) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: short_session_id(),
            creator,
            participants: Vec::new(),
            phase: GamePhase::Lobby,
            max_bans,
            pool_size,
            votes: HashMap::new(),
            resolved_settings: None,
            bans: HashMap::new(),
            pools: HashMap::new(),
            selections: HashMap::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Check if `id` is the session creator.
    pub fn is_creator(&self, id: &ParticipantId) -> bool {
        &self.creator == id
    }

    /// Check if `id` has joined the session.
    pub fn is_participant(&self, id: &ParticipantId) -> bool {
        self.participants.contains(id)
    }

    /// Appends a participant to the roster. Returns `false` for duplicates.
    pub fn add_participant(&mut self, id: ParticipantId) -> bool {
        if self.is_participant(&id) {
            return false;
        }
        self.participants.push(id);
        true
    }

    /// A participant's submitted vote sheet, if any.
    pub fn vote_for(&self, id: &ParticipantId) -> Option<&VoteSheet> {
        self.votes.get(id)
    }

    /// A participant's submitted ban set, if any.
    pub fn bans_for(&self, id: &ParticipantId) -> Option<&BTreeSet<String>> {
        self.bans.get(id)
    }

    /// A participant's assigned pool, if pools have been allocated.
    pub fn pool_for(&self, id: &ParticipantId) -> Option<&[String]> {
        self.pools.get(id).map(|p| p.as_slice())
    }

    /// A participant's finalized selection, if any.
    pub fn selection_for(&self, id: &ParticipantId) -> Option<&str> {
        self.selections.get(id).map(|s| s.as_str())
    }

    /// Whether every participant has a full vote sheet recorded.
    ///
    /// Submissions are all-or-nothing, so presence implies completeness.
    pub fn all_voted(&self) -> bool {
        self.participants.iter().all(|p| self.votes.contains_key(p))
    }

    /// Whether every participant has a ban entry present.
    ///
    /// Presence, not non-emptiness: an empty ban set is a legitimate
    /// completed submission.
    pub fn all_banned(&self) -> bool {
        self.participants.iter().all(|p| self.bans.contains_key(p))
    }

    /// Whether every participant has finalized a selection.
    pub fn all_selected(&self) -> bool {
        self.participants
            .iter()
            .all(|p| self.selections.contains_key(p))
    }

    /// The union of every submitted ban set.
    pub fn banned_items(&self) -> BTreeSet<String> {
        self.bans.values().flatten().cloned().collect()
    }

    /// Refreshes the `updated_at` timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}

/// Generates a short unique session id (first 8 hex chars of a UUID v4).
fn short_session_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}
