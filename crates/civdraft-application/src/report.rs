//! Read-model reports derived from a session snapshot.
//!
//! Pure data for the presentation layer: no formatting, no platform types.

use civdraft_core::resolve::ResolvedSetting;
use civdraft_core::session::{GamePhase, ParticipantId, Session};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One participant's submission status across the phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantProgress {
    pub participant: ParticipantId,
    /// A full vote sheet is recorded
    pub voted: bool,
    /// A ban entry is present (possibly empty)
    pub banned: bool,
    /// Number of items in the submitted ban entry
    pub ban_count: usize,
    /// A selection is finalized
    pub selected: bool,
}

/// Per-participant progress for a session, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub session_id: String,
    pub phase: GamePhase,
    pub participants: Vec<ParticipantProgress>,
}

impl ProgressReport {
    pub fn from_session(session: &Session) -> Self {
        let participants = session
            .participants
            .iter()
            .map(|p| ParticipantProgress {
                participant: p.clone(),
                voted: session.vote_for(p).is_some(),
                banned: session.bans_for(p).is_some(),
                ban_count: session.bans_for(p).map_or(0, |b| b.len()),
                selected: session.selection_for(p).is_some(),
            })
            .collect();
        Self {
            session_id: session.id.clone(),
            phase: session.phase,
            participants,
        }
    }

    /// How many participants have completed the current phase's submission.
    pub fn completed_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| match self.phase {
                GamePhase::Voting => p.voted,
                GamePhase::Banning => p.banned,
                GamePhase::Selecting => p.selected,
                GamePhase::Lobby | GamePhase::Completed => true,
            })
            .count()
    }
}

/// How often one item was banned, and by whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanCount {
    pub item: String,
    pub banned_by: Vec<ParticipantId>,
}

/// The combined outcome of a session, as far as it has progressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResults {
    pub session_id: String,
    pub phase: GamePhase,
    /// Resolved ruleset; empty until voting completed
    pub settings: BTreeMap<String, ResolvedSetting>,
    /// Finalized selections in roster order
    pub selections: Vec<(ParticipantId, String)>,
    /// Banned items, most-banned first
    pub ban_tally: Vec<BanCount>,
}

impl FinalResults {
    pub fn from_session(session: &Session) -> Self {
        let selections = session
            .participants
            .iter()
            .filter_map(|p| {
                session
                    .selection_for(p)
                    .map(|item| (p.clone(), item.to_string()))
            })
            .collect();

        let mut by_item: BTreeMap<String, Vec<ParticipantId>> = BTreeMap::new();
        for (participant, items) in &session.bans {
            for item in items {
                by_item
                    .entry(item.clone())
                    .or_default()
                    .push(participant.clone());
            }
        }
        let mut ban_tally: Vec<BanCount> = by_item
            .into_iter()
            .map(|(item, mut banned_by)| {
                banned_by.sort();
                BanCount { item, banned_by }
            })
            .collect();
        ban_tally.sort_by(|a, b| b.banned_by.len().cmp(&a.banned_by.len()));

        Self {
            session_id: session.id.clone(),
            phase: session.phase,
            settings: session.resolved_settings.clone().unwrap_or_default(),
            selections,
            ban_tally,
        }
    }
}
