//! Civdraft application layer.
//!
//! The externally-facing façade over the core engine: [`DraftService`]
//! serializes operations per session, drives the phase machine, persists
//! through the injected repository and forwards events to the notification
//! sink. [`VoteDraft`] and the report types support the presentation layer
//! without leaking engine internals.

pub mod draft;
pub mod draft_service;
pub mod report;

pub use draft::VoteDraft;
pub use draft_service::DraftService;
pub use report::{BanCount, FinalResults, ParticipantProgress, ProgressReport};
