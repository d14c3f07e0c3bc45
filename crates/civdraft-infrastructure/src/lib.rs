//! Civdraft infrastructure: storage backends and default collaborators.
//!
//! Implements the persistence and notification contracts defined by
//! `civdraft-core`:
//!
//! - [`JsonDirSessionRepository`]: one atomically-written JSON file per
//!   session under the per-user config directory
//! - [`MemorySessionRepository`]: in-memory store for tests and embedding
//! - [`TracingNotificationSink`]: logs session events via `tracing`

pub mod json_session_repository;
pub mod memory_session_repository;
pub mod paths;
pub mod storage;
pub mod tracing_sink;

pub use json_session_repository::JsonDirSessionRepository;
pub use memory_session_repository::MemorySessionRepository;
pub use paths::CivdraftPaths;
pub use tracing_sink::TracingNotificationSink;
