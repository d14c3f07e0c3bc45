//! Session phase machine: the invariant-enforcing mutation operations.
//!
//! Every operation validates against the current phase and roster, mutates
//! the session, and returns the [`SessionEvent`]s the mutation produced.
//! Completion checks run synchronously inside the operation that produced
//! the triggering submission; there is no poller.
//!
//! Operations are pure with respect to IO: loading, persistence and event
//! delivery belong to the application layer.

use super::event::SessionEvent;
use super::model::{ParticipantId, Session, VoteSheet};
use super::phase::GamePhase;
use crate::catalog::ItemCatalog;
use crate::error::{DraftError, Result};
use crate::resolve::ResolvedSetting;
use crate::{pool, resolve};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Result of a join attempt: a duplicate join is a notice, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyInSession,
}

impl Session {
    fn require_phase(&self, expected: GamePhase) -> Result<()> {
        if self.phase != expected {
            return Err(DraftError::phase_mismatch(expected, self.phase));
        }
        Ok(())
    }

    fn require_participant(&self, id: &ParticipantId) -> Result<()> {
        if !self.is_participant(id) {
            return Err(DraftError::NotParticipant(id.clone()));
        }
        Ok(())
    }

    /// Moves the session to a strictly later phase.
    fn advance_phase(&mut self, to: GamePhase) -> SessionEvent {
        debug_assert!(to > self.phase, "phases never regress");
        let from = self.phase;
        self.phase = to;
        tracing::info!(session = %self.id, %from, %to, "phase advanced");
        SessionEvent::PhaseAdvanced {
            session_id: self.id.clone(),
            from,
            to,
        }
    }

    /// Adds `participant` to the roster while the lobby is open.
    ///
    /// A duplicate join succeeds with [`JoinOutcome::AlreadyInSession`] and
    /// changes nothing.
    pub fn join(&mut self, participant: ParticipantId) -> Result<JoinOutcome> {
        self.require_phase(GamePhase::Lobby)?;
        if self.add_participant(participant) {
            self.touch();
            Ok(JoinOutcome::Joined)
        } else {
            Ok(JoinOutcome::AlreadyInSession)
        }
    }

    /// Freezes the roster and opens the voting phase. Creator only.
    pub fn start_voting(&mut self, requester: &ParticipantId) -> Result<SessionEvent> {
        if !self.is_creator(requester) {
            return Err(DraftError::NotCreator);
        }
        if self.phase != GamePhase::Lobby {
            return Err(DraftError::AlreadyStarted);
        }
        if self.participants.is_empty() {
            return Err(DraftError::NoParticipants);
        }
        self.touch();
        Ok(self.advance_phase(GamePhase::Voting))
    }

    /// Records a full vote sheet for `participant`.
    ///
    /// Submission is all-or-nothing: the sheet must cover every configured
    /// category with a known option, or nothing is persisted. While the
    /// phase remains open a resubmission overwrites the previous sheet.
    ///
    /// When the last sheet arrives the ruleset is resolved and the session
    /// advances to Banning.
    pub fn submit_vote<R: Rng>(
        &mut self,
        participant: ParticipantId,
        sheet: VoteSheet,
        catalog: &ItemCatalog,
        rng: &mut R,
    ) -> Result<Vec<SessionEvent>> {
        self.require_phase(GamePhase::Voting)?;
        self.require_participant(&participant)?;

        let missing: Vec<String> = catalog
            .categories()
            .iter()
            .filter(|c| !sheet.contains_key(&c.name))
            .map(|c| c.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(DraftError::IncompleteVote { missing });
        }
        for (category, option) in &sheet {
            let known = catalog
                .category(category)
                .is_some_and(|c| c.has_option(option));
            if !known {
                return Err(DraftError::UnknownOption {
                    category: category.clone(),
                    option: option.clone(),
                });
            }
        }

        self.votes.insert(participant, sheet);
        self.touch();

        let mut events = Vec::new();
        if self.all_voted() {
            events.extend(self.complete_voting(catalog, rng));
        }
        Ok(events)
    }

    /// Records a ban set for `participant` (possibly empty, at most
    /// `max_bans` items). Overwrite semantics match voting.
    ///
    /// When every participant has a ban entry present, pools are allocated
    /// and the session advances to Selecting. If the surviving catalog is
    /// too small the submission still succeeds, the transition halts, and
    /// an [`SessionEvent::AllocationFailed`] is emitted.
    pub fn submit_bans<R: Rng>(
        &mut self,
        participant: ParticipantId,
        items: BTreeSet<String>,
        catalog: &ItemCatalog,
        rng: &mut R,
    ) -> Result<Vec<SessionEvent>> {
        self.require_phase(GamePhase::Banning)?;
        self.require_participant(&participant)?;

        if items.len() > self.max_bans as usize {
            return Err(DraftError::TooManyBans {
                submitted: items.len(),
                max: self.max_bans,
            });
        }
        for item in &items {
            if !catalog.contains_item(item) {
                return Err(DraftError::UnknownItem(item.clone()));
            }
        }

        self.bans.insert(participant, items);
        self.touch();

        let mut events = Vec::new();
        if self.all_banned() {
            match self.complete_banning(catalog, rng) {
                Ok(evs) => events.extend(evs),
                Err(DraftError::Insufficient {
                    available,
                    required,
                }) => {
                    let reason = format!(
                        "{available} items available, {required} required for {} pools of {}",
                        self.participants.len(),
                        self.pool_size
                    );
                    tracing::warn!(session = %self.id, %reason, "pool allocation halted");
                    events.push(SessionEvent::AllocationFailed {
                        session_id: self.id.clone(),
                        reason,
                    });
                }
                Err(other) => return Err(other),
            }
        }
        Ok(events)
    }

    /// Finalizes `participant`'s selection. One-shot: a second attempt fails
    /// with [`DraftError::AlreadySelected`] even for the same item.
    ///
    /// When the last selection lands the session completes.
    pub fn submit_selection(
        &mut self,
        participant: ParticipantId,
        item: String,
    ) -> Result<Vec<SessionEvent>> {
        self.require_phase(GamePhase::Selecting)?;
        self.require_participant(&participant)?;

        if self.selections.contains_key(&participant) {
            return Err(DraftError::AlreadySelected(participant));
        }
        let in_pool = self
            .pools
            .get(&participant)
            .is_some_and(|p| p.contains(&item));
        if !in_pool {
            return Err(DraftError::NotInPool { item });
        }

        self.selections.insert(participant, item);
        self.touch();

        let mut events = Vec::new();
        if self.all_selected() {
            events.push(self.advance_phase(GamePhase::Completed));
        }
        Ok(events)
    }

    /// Administrative phase skip. Creator only.
    ///
    /// Valid targets lie strictly after the current phase and never before
    /// Banning (Voting is mandatory). Crossing the Voting→Banning boundary
    /// resolves the ruleset from whatever votes exist, with zero-vote
    /// categories falling back to their default option. Crossing the
    /// Banning→Selecting boundary allocates pools from whatever bans exist
    /// (missing entries count as empty).
    ///
    /// Everything is staged before commit: a failed allocation leaves the
    /// session unchanged.
    pub fn force_advance<R: Rng>(
        &mut self,
        requester: &ParticipantId,
        target: GamePhase,
        catalog: &ItemCatalog,
        rng: &mut R,
    ) -> Result<Vec<SessionEvent>> {
        if !self.is_creator(requester) {
            return Err(DraftError::NotCreator);
        }
        if !self.phase.can_force_to(target) {
            return Err(DraftError::InvalidTarget(format!(
                "cannot force from '{}' to '{}'",
                self.phase, target
            )));
        }

        let crosses_resolution =
            self.phase < GamePhase::Banning && self.resolved_settings.is_none();
        let staged_settings = if crosses_resolution {
            Some(resolve::resolve_settings_forced(
                &self.votes,
                catalog.categories(),
                rng,
            ))
        } else {
            None
        };

        let crosses_allocation = self.phase < GamePhase::Selecting
            && target >= GamePhase::Selecting;
        let staged_pools = if crosses_allocation {
            let available = catalog.available_excluding(&self.banned_items());
            let pools = pool::allocate(&available, self.participants.len(), self.pool_size, rng)?;
            Some(
                self.participants
                    .iter()
                    .cloned()
                    .zip(pools)
                    .collect::<HashMap<ParticipantId, Vec<String>>>(),
            )
        } else {
            None
        };

        let mut events = Vec::new();
        if let Some(settings) = staged_settings {
            events.push(SessionEvent::ResolutionComputed {
                session_id: self.id.clone(),
                settings: settings.clone(),
            });
            self.resolved_settings = Some(settings);
        }
        if let Some(pools) = staged_pools {
            self.pools = pools;
        }
        events.push(self.advance_phase(target));
        self.touch();
        Ok(events)
    }

    /// Resolves the ruleset and advances to Banning.
    fn complete_voting<R: Rng>(&mut self, catalog: &ItemCatalog, rng: &mut R) -> Vec<SessionEvent> {
        let settings = self.cached_or_resolve(catalog, rng);
        vec![
            SessionEvent::ResolutionComputed {
                session_id: self.id.clone(),
                settings,
            },
            self.advance_phase(GamePhase::Banning),
        ]
    }

    /// Returns the cached resolution, computing and caching it on first use.
    ///
    /// Once set, the cached value is returned verbatim; it is never re-drawn.
    fn cached_or_resolve<R: Rng>(
        &mut self,
        catalog: &ItemCatalog,
        rng: &mut R,
    ) -> BTreeMap<String, ResolvedSetting> {
        if self.resolved_settings.is_none() {
            let settings = resolve::resolve_settings(&self.votes, catalog.categories(), rng);
            tracing::debug!(session = %self.id, categories = settings.len(), "ruleset resolved");
            self.resolved_settings = Some(settings);
        }
        self.resolved_settings.clone().unwrap_or_default()
    }

    /// Allocates pools from the surviving catalog and advances to Selecting.
    fn complete_banning<R: Rng>(
        &mut self,
        catalog: &ItemCatalog,
        rng: &mut R,
    ) -> Result<Vec<SessionEvent>> {
        let available = catalog.available_excluding(&self.banned_items());
        let pools = pool::allocate(&available, self.participants.len(), self.pool_size, rng)?;
        self.pools = self.participants.iter().cloned().zip(pools).collect();
        Ok(vec![self.advance_phase(GamePhase::Selecting)])
    }
}
