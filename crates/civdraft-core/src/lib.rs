//! Civdraft core domain.
//!
//! The session lifecycle engine for a multi-round, multi-participant
//! elimination-and-selection workflow: participants vote on ruleset options,
//! ban items from a shared catalog, then each privately selects a unique item
//! from a randomly assigned pool.
//!
//! This crate holds the domain layer only: the session aggregate and its
//! phase machine, the weighted-random resolution engine, the pool allocator,
//! the item catalog, and the persistence/notification contracts. Storage
//! backends live in `civdraft-infrastructure`; the externally-facing service
//! lives in `civdraft-application`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod pool;
pub mod resolve;
pub mod session;

// Re-export common error type
pub use error::{DraftError, Result};
