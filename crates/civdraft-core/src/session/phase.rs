//! Session phase types.
//!
//! A session walks a strict total order of phases; the derived `Ord` makes
//! monotonicity an ordering check.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The current stage of a session's workflow.
///
/// Phases only ever advance: `Lobby → Voting → Banning → Selecting →
/// Completed`. A phase may be skipped via a creator force-advance, but a
/// session never moves backwards and never re-enters a phase.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GamePhase {
    /// Participants are joining; the roster is open.
    Lobby,
    /// Participants submit full vote sheets for the ruleset categories.
    Voting,
    /// Participants ban items from the shared catalog.
    Banning,
    /// Each participant picks one item from their assigned pool.
    Selecting,
    /// All selections are in; the session is logically terminated.
    Completed,
}

impl GamePhase {
    /// The phase that naturally follows this one, if any.
    pub fn next(self) -> Option<GamePhase> {
        match self {
            GamePhase::Lobby => Some(GamePhase::Voting),
            GamePhase::Voting => Some(GamePhase::Banning),
            GamePhase::Banning => Some(GamePhase::Selecting),
            GamePhase::Selecting => Some(GamePhase::Completed),
            GamePhase::Completed => None,
        }
    }

    /// Whether the session has reached its terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Completed)
    }

    /// Whether a creator may force the session from this phase to `target`.
    ///
    /// Voting is mandatory: only `Banning`, `Selecting` and `Completed` are
    /// valid targets, and only from a strictly earlier phase that has itself
    /// passed `Lobby`.
    pub fn can_force_to(self, target: GamePhase) -> bool {
        self >= GamePhase::Voting && target > self && target >= GamePhase::Banning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering_is_total() {
        assert!(GamePhase::Lobby < GamePhase::Voting);
        assert!(GamePhase::Voting < GamePhase::Banning);
        assert!(GamePhase::Banning < GamePhase::Selecting);
        assert!(GamePhase::Selecting < GamePhase::Completed);
    }

    #[test]
    fn test_next_walks_the_chain() {
        let mut phase = GamePhase::Lobby;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(phase, GamePhase::Completed);
    }

    #[test]
    fn test_force_targets() {
        // Voting can never be skipped or re-entered.
        assert!(!GamePhase::Lobby.can_force_to(GamePhase::Banning));
        assert!(!GamePhase::Banning.can_force_to(GamePhase::Voting));
        // No backwards or same-phase moves.
        assert!(!GamePhase::Selecting.can_force_to(GamePhase::Banning));
        assert!(!GamePhase::Banning.can_force_to(GamePhase::Banning));
        // Legitimate skips.
        assert!(GamePhase::Voting.can_force_to(GamePhase::Banning));
        assert!(GamePhase::Voting.can_force_to(GamePhase::Selecting));
        assert!(GamePhase::Banning.can_force_to(GamePhase::Selecting));
        assert!(GamePhase::Selecting.can_force_to(GamePhase::Completed));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&GamePhase::Selecting).unwrap();
        assert_eq!(json, "\"selecting\"");
        let back: GamePhase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GamePhase::Selecting);
    }
}
