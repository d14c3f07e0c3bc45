//! Unified path management for civdraft data files.
//!
//! All session data lives under one per-user configuration directory so
//! every storage backend resolves locations the same way across platforms.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// User configuration directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find user config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for civdraft.
///
/// # Directory Structure
///
/// ```text
/// <user config dir>/civdraft/     # e.g. ~/.config/civdraft on Linux
/// ├── config.toml                 # Engine configuration overrides
/// └── sessions/                   # One JSON file per session
///     └── <session-id>.json
/// ```
pub struct CivdraftPaths;

impl CivdraftPaths {
    /// The civdraft configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("civdraft"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// The directory holding per-session JSON files.
    pub fn sessions_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("sessions"))
    }

    /// The engine configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
