//! Error types for the Civdraft engine.

use crate::session::{GamePhase, ParticipantId};
use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire Civdraft engine.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
///
/// Variants fall into four families:
/// - configuration errors (`InvalidConfig`), rejected before any state exists
/// - state errors (`PhaseMismatch`, `NotCreator`, ...), rejected with no mutation
/// - capacity errors (`TooManyBans`, `Insufficient`), rejected with no mutation
/// - not-found and storage errors (`NotFound`, `Io`, `Serialization`, ...)
#[derive(Error, Debug, Clone, Serialize)]
pub enum DraftError {
    /// Invalid creation parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation attempted in the wrong session phase
    #[error("Operation requires phase '{expected}', session is in '{actual}'")]
    PhaseMismatch {
        expected: GamePhase,
        actual: GamePhase,
    },

    /// Privileged operation attempted by a non-creator
    #[error("Only the session creator may perform this operation")]
    NotCreator,

    /// The participant has not joined the session
    #[error("Participant '{0}' has not joined this session")]
    NotParticipant(ParticipantId),

    /// Voting cannot start with an empty roster
    #[error("Session has no participants")]
    NoParticipants,

    /// Voting has already started; the roster is frozen
    #[error("Voting has already started")]
    AlreadyStarted,

    /// A vote sheet did not cover every configured category
    #[error("Vote sheet is incomplete: missing {missing:?}")]
    IncompleteVote { missing: Vec<String> },

    /// A vote named an option the category does not offer
    #[error("Unknown option '{option}' for category '{category}'")]
    UnknownOption { category: String, option: String },

    /// A ban or selection named an item outside the catalog
    #[error("Unknown item '{0}'")]
    UnknownItem(String),

    /// Ban set exceeds the per-participant ceiling
    #[error("Too many bans: submitted {submitted}, maximum {max}")]
    TooManyBans { submitted: usize, max: u32 },

    /// Selection outside the participant's assigned pool
    #[error("Item '{item}' is not in your assigned pool")]
    NotInPool { item: String },

    /// A selection was already finalized; selections are one-shot
    #[error("Participant '{0}' has already finalized a selection")]
    AlreadySelected(ParticipantId),

    /// Force-advance to a phase that cannot be forced
    #[error("Invalid force-advance target: {0}")]
    InvalidTarget(String),

    /// Not enough items remain to allocate the requested pools
    #[error("Not enough items to allocate pools: {available} available, {required} required")]
    Insufficient { available: usize, required: usize },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DraftError {
    /// Creates an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Creates a PhaseMismatch error
    pub fn phase_mismatch(expected: GamePhase, actual: GamePhase) -> Self {
        Self::PhaseMismatch { expected, actual }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a phase/role validation error (session left unchanged)
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::PhaseMismatch { .. }
                | Self::NotCreator
                | Self::NotParticipant(_)
                | Self::NoParticipants
                | Self::AlreadyStarted
                | Self::AlreadySelected(_)
                | Self::NotInPool { .. }
                | Self::InvalidTarget(_)
        )
    }

    /// Check if this is a capacity error (ban ceiling or pool exhaustion)
    pub fn is_capacity_error(&self) -> bool {
        matches!(self, Self::TooManyBans { .. } | Self::Insufficient { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DraftError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DraftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DraftError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DraftError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at infrastructure seams)
impl From<anyhow::Error> for DraftError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, DraftError>`.
pub type Result<T> = std::result::Result<T, DraftError>;
