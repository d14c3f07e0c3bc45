//! Session domain module.
//!
//! This module contains the session aggregate, its phase machine, the
//! repository interface, and the outbound event contract.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `ParticipantId`)
//! - `phase`: Phase enumeration and transition rules (`GamePhase`)
//! - `machine`: Invariant-enforcing mutation operations
//! - `event`: Outbound events and the `NotificationSink` contract
//! - `repository`: Repository trait for session persistence

mod event;
mod machine;
mod model;
mod phase;
mod repository;

// Re-export public API
pub use event::{NotificationSink, SessionEvent};
pub use machine::JoinOutcome;
pub use model::{ParticipantId, Session, VoteSheet};
pub use phase::GamePhase;
pub use repository::SessionRepository;
