//! Draft service: the externally-facing session façade.
//!
//! `DraftService` coordinates the session phase machine with the injected
//! repository and notification sink. Every mutating operation runs as one
//! critical section per session id:
//!
//! 1. acquire the session's lock
//! 2. load the current record
//! 3. validate + mutate in memory (phase machine)
//! 4. persist with a single save
//! 5. emit the produced events (fire-and-forget)
//!
//! A failed persist discards the in-memory change, so the operation is
//! atomic from the caller's point of view. Operations on distinct session
//! ids proceed independently and in parallel.

use crate::report::{FinalResults, ProgressReport};
use civdraft_core::catalog::ItemCatalog;
use civdraft_core::config::{self, DraftConfig};
use civdraft_core::error::{DraftError, Result};
use civdraft_core::session::{
    GamePhase, JoinOutcome, NotificationSink, ParticipantId, Session, SessionEvent,
    SessionRepository, VoteSheet,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Coordinates session lifecycle operations against a storage backend.
///
/// # Thread Safety
///
/// All operations take `&self`; internal state is wrapped in `Arc`/locks so
/// a single service instance can be shared across tasks.
pub struct DraftService {
    /// Persistent storage backend for session data
    repository: Arc<dyn SessionRepository>,
    /// Outbound sink for session events
    sink: Arc<dyn NotificationSink>,
    /// Static item registry and voting categories
    catalog: ItemCatalog,
    /// Engine defaults for new sessions
    config: DraftConfig,
    /// Random source for resolution draws and pool shuffles
    rng: Mutex<StdRng>,
    /// One mutex per session id; serializes same-session operations
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl DraftService {
    /// Creates a service with the default catalog and configuration.
    pub fn new(repository: Arc<dyn SessionRepository>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            repository,
            sink,
            catalog: ItemCatalog::default(),
            config: DraftConfig::default(),
            rng: Mutex::new(StdRng::from_entropy()),
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Replaces the item catalog (custom item sets, test fixtures).
    pub fn with_catalog(mut self, catalog: ItemCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replaces the engine configuration.
    pub fn with_config(mut self, config: DraftConfig) -> Self {
        self.config = config;
        self
    }

    /// Seeds the random source, making resolution draws and pool shuffles
    /// reproducible. Intended for tests.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// The catalog this service operates on.
    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    // ========================================================================
    // Session lifecycle operations
    // ========================================================================

    /// Creates a new session in the Lobby phase and persists it.
    ///
    /// `max_bans`/`pool_size` default from the engine configuration when not
    /// given; both are validated against the hard bounds.
    pub async fn create_session(
        &self,
        creator: ParticipantId,
        max_bans: Option<u32>,
        pool_size: Option<usize>,
    ) -> Result<Session> {
        let max_bans = max_bans.unwrap_or(self.config.default_max_bans);
        let pool_size = pool_size.unwrap_or(self.config.default_pool_size);
        config::validate_limits(max_bans, pool_size)?;

        let session = Session::new(creator, max_bans, pool_size);
        self.repository.save(&session).await?;
        tracing::info!(session = %session.id, %max_bans, %pool_size, "session created");
        Ok(session)
    }

    /// Adds `participant` to a lobby. Duplicate joins succeed with a notice.
    pub async fn join(&self, session_id: &str, participant: ParticipantId) -> Result<JoinOutcome> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self.load(session_id).await?;
        let outcome = session.join(participant)?;
        if outcome == JoinOutcome::Joined {
            self.repository.save(&session).await?;
        }
        Ok(outcome)
    }

    /// Freezes the roster and opens voting. Creator only.
    pub async fn start_voting(
        &self,
        session_id: &str,
        requester: &ParticipantId,
    ) -> Result<Session> {
        self.mutate(session_id, |session, _, _| {
            let event = session.start_voting(requester)?;
            Ok(vec![event])
        })
        .await
    }

    /// Records a full vote sheet; advances to Banning when the last sheet
    /// arrives.
    pub async fn submit_vote(
        &self,
        session_id: &str,
        participant: ParticipantId,
        sheet: VoteSheet,
    ) -> Result<Session> {
        self.mutate(session_id, |session, catalog, rng| {
            session.submit_vote(participant, sheet, catalog, rng)
        })
        .await
    }

    /// Records a ban set; advances to Selecting when every participant has
    /// submitted (allocation failure stalls the phase instead).
    pub async fn submit_bans(
        &self,
        session_id: &str,
        participant: ParticipantId,
        items: BTreeSet<String>,
    ) -> Result<Session> {
        self.mutate(session_id, |session, catalog, rng| {
            session.submit_bans(participant, items, catalog, rng)
        })
        .await
    }

    /// Finalizes one selection; completes the session when the last one
    /// lands.
    pub async fn submit_selection(
        &self,
        session_id: &str,
        participant: ParticipantId,
        item: String,
    ) -> Result<Session> {
        self.mutate(session_id, |session, _, _| {
            session.submit_selection(participant, item)
        })
        .await
    }

    /// Administrative phase skip. Creator only.
    pub async fn force_advance(
        &self,
        session_id: &str,
        requester: &ParticipantId,
        target: GamePhase,
    ) -> Result<Session> {
        self.mutate(session_id, |session, catalog, rng| {
            session.force_advance(requester, target, catalog, rng)
        })
        .await
    }

    /// Deletes a session unconditionally. Creator only; not a phase
    /// transition.
    pub async fn delete_session(&self, session_id: &str, requester: &ParticipantId) -> Result<()> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let session = self.load(session_id).await?;
        if !session.is_creator(requester) {
            return Err(DraftError::NotCreator);
        }
        self.repository.delete(session_id).await?;
        tracing::info!(session = %session_id, "session deleted");

        let mut locks = self.locks.write().await;
        locks.remove(session_id);
        Ok(())
    }

    // ========================================================================
    // Read operations
    // ========================================================================

    /// Loads a session snapshot.
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.load(session_id).await
    }

    /// All stored sessions.
    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.repository.list_all().await
    }

    /// Per-participant submission status for the current phase.
    pub async fn progress(&self, session_id: &str) -> Result<ProgressReport> {
        let session = self.load(session_id).await?;
        Ok(ProgressReport::from_session(&session))
    }

    /// Resolved settings, selections and ban tally, as far as the session
    /// has progressed.
    pub async fn results(&self, session_id: &str) -> Result<FinalResults> {
        let session = self.load(session_id).await?;
        Ok(FinalResults::from_session(&session))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Runs one load→mutate→persist→notify critical section and returns the
    /// persisted snapshot.
    async fn mutate<F>(&self, session_id: &str, op: F) -> Result<Session>
    where
        F: FnOnce(&mut Session, &ItemCatalog, &mut StdRng) -> Result<Vec<SessionEvent>>,
    {
        let lock = self.session_lock(session_id).await;
        let (session, events) = {
            let _guard = lock.lock().await;

            let mut session = self.load(session_id).await?;
            let events = {
                let mut rng = self.rng.lock().await;
                op(&mut session, &self.catalog, &mut rng)?
            };

            // Single persistence call; on failure the mutated copy is
            // dropped and the stored record is still the pre-operation
            // state.
            self.repository.save(&session).await?;
            (session, events)
        };

        // Outside the critical section: delivery never blocks or rolls back
        // a committed transition.
        for event in events {
            self.sink.publish(event).await;
        }
        Ok(session)
    }

    async fn load(&self, session_id: &str) -> Result<Session> {
        self.repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DraftError::not_found("session", session_id))
    }

    /// Returns the mutex serializing operations for `session_id`.
    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(session_id) {
                return lock.clone();
            }
        }
        let mut locks = self.locks.write().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use civdraft_core::catalog::{CatalogItem, SetupCategory};
    use civdraft_infrastructure::MemorySessionRepository;
    use std::sync::Mutex as StdMutex;

    /// Sink that records every published event for assertions.
    #[derive(Default)]
    struct RecordingSink {
        events: StdMutex<Vec<SessionEvent>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<SessionEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn publish(&self, event: SessionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    /// Repository wrapper that fails every save after an initial grace
    /// count, for persist-failure atomicity tests.
    struct FlakyRepository {
        inner: MemorySessionRepository,
        saves_left: StdMutex<u32>,
    }

    impl FlakyRepository {
        fn failing_after(saves: u32) -> Self {
            Self {
                inner: MemorySessionRepository::new(),
                saves_left: StdMutex::new(saves),
            }
        }
    }

    #[async_trait]
    impl SessionRepository for FlakyRepository {
        async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
            self.inner.find_by_id(session_id).await
        }

        async fn save(&self, session: &Session) -> Result<()> {
            {
                let mut left = self.saves_left.lock().unwrap();
                if *left == 0 {
                    return Err(DraftError::io("disk full"));
                }
                *left -= 1;
            }
            self.inner.save(session).await
        }

        async fn delete(&self, session_id: &str) -> Result<()> {
            self.inner.delete(session_id).await
        }

        async fn list_all(&self) -> Result<Vec<Session>> {
            self.inner.list_all().await
        }
    }

    fn pid(s: &str) -> ParticipantId {
        ParticipantId::from(s)
    }

    fn test_catalog() -> ItemCatalog {
        let items = (0..8)
            .map(|i| CatalogItem {
                name: format!("Civ{i}"),
                leader: format!("Leader{i}"),
                emoji: "🏛️".to_string(),
                link: String::new(),
            })
            .collect();
        ItemCatalog::new(
            items,
            vec![SetupCategory::new("Map", &["Continents", "Pangaea"])],
        )
    }

    fn service_with(sink: Arc<RecordingSink>) -> DraftService {
        DraftService::new(Arc::new(MemorySessionRepository::new()), sink)
            .with_catalog(test_catalog())
            .with_rng_seed(11)
    }

    fn map_sheet(option: &str) -> VoteSheet {
        [("Map".to_string(), option.to_string())].into_iter().collect()
    }

    #[tokio::test]
    async fn test_create_applies_defaults_and_bounds() {
        let service = service_with(Arc::new(RecordingSink::default()));

        let session = service
            .create_session(pid("creator"), None, None)
            .await
            .unwrap();
        assert_eq!(session.max_bans, 2);
        assert_eq!(session.pool_size, 3);
        assert_eq!(session.phase, GamePhase::Lobby);

        let err = service
            .create_session(pid("creator"), Some(11), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::InvalidConfig(_)));
        let err = service
            .create_session(pid("creator"), None, Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let service = service_with(Arc::new(RecordingSink::default()));
        let err = service.join("nope", pid("p1")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_events_flow_through_the_sink() {
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(sink.clone());

        let session = service
            .create_session(pid("creator"), Some(0), Some(2))
            .await
            .unwrap();
        service.join(&session.id, pid("p1")).await.unwrap();
        service
            .start_voting(&session.id, &pid("creator"))
            .await
            .unwrap();
        service
            .submit_vote(&session.id, pid("p1"), map_sheet("Pangaea"))
            .await
            .unwrap();

        let events = sink.events();
        // start_voting → PhaseAdvanced; vote completion → ResolutionComputed
        // + PhaseAdvanced.
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SessionEvent::PhaseAdvanced { .. }));
        assert!(matches!(events[1], SessionEvent::ResolutionComputed { .. }));
        assert!(matches!(
            events[2],
            SessionEvent::PhaseAdvanced {
                to: GamePhase::Banning,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_stored_state_unchanged() {
        // 2 saves: create + join. The start_voting save fails.
        let repository = Arc::new(FlakyRepository::failing_after(2));
        let service = DraftService::new(repository, Arc::new(RecordingSink::default()))
            .with_catalog(test_catalog())
            .with_rng_seed(11);

        let session = service
            .create_session(pid("creator"), Some(1), Some(2))
            .await
            .unwrap();
        service.join(&session.id, pid("p1")).await.unwrap();

        let err = service
            .start_voting(&session.id, &pid("creator"))
            .await
            .unwrap_err();
        assert!(err.is_io());

        // The stored record still shows the pre-operation phase.
        let stored = service.get_session(&session.id).await.unwrap();
        assert_eq!(stored.phase, GamePhase::Lobby);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_advance_exactly_once() {
        let sink = Arc::new(RecordingSink::default());
        let service = Arc::new(service_with(sink.clone()));

        let session = service
            .create_session(pid("creator"), Some(0), Some(2))
            .await
            .unwrap();
        for p in ["p1", "p2", "p3"] {
            service.join(&session.id, pid(p)).await.unwrap();
        }
        service
            .start_voting(&session.id, &pid("creator"))
            .await
            .unwrap();

        // All three participants vote at the same time.
        let mut handles = Vec::new();
        for p in ["p1", "p2", "p3"] {
            let service = service.clone();
            let id = session.id.clone();
            handles.push(tokio::spawn(async move {
                service.submit_vote(&id, pid(p), map_sheet("Pangaea")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = service.get_session(&session.id).await.unwrap();
        assert_eq!(stored.phase, GamePhase::Banning);
        assert_eq!(stored.votes.len(), 3);

        // Exactly one completion: one ResolutionComputed, two PhaseAdvanced
        // (Lobby→Voting, Voting→Banning).
        let events = sink.events();
        let resolutions = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::ResolutionComputed { .. }))
            .count();
        assert_eq!(resolutions, 1);
        let advances = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::PhaseAdvanced { .. }))
            .count();
        assert_eq!(advances, 2);
    }

    #[tokio::test]
    async fn test_delete_requires_creator() {
        let service = service_with(Arc::new(RecordingSink::default()));
        let session = service
            .create_session(pid("creator"), None, None)
            .await
            .unwrap();

        let err = service
            .delete_session(&session.id, &pid("p1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::NotCreator));

        service
            .delete_session(&session.id, &pid("creator"))
            .await
            .unwrap();
        assert!(
            service
                .get_session(&session.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let service = service_with(Arc::new(RecordingSink::default()));

        let a = service
            .create_session(pid("alice"), Some(1), Some(2))
            .await
            .unwrap();
        let b = service
            .create_session(pid("bob"), Some(2), Some(3))
            .await
            .unwrap();

        service.join(&a.id, pid("p1")).await.unwrap();
        service.start_voting(&a.id, &pid("alice")).await.unwrap();

        // Session B is untouched by session A's progress.
        let stored_b = service.get_session(&b.id).await.unwrap();
        assert_eq!(stored_b.phase, GamePhase::Lobby);
        assert_eq!(service.list_sessions().await.unwrap().len(), 2);
    }
}
