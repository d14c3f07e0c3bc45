//! Engine configuration.
//!
//! Session creation parameters come from the caller, but their defaults and
//! hard bounds live here. The config is serde-backed so deployments can
//! override defaults from a TOML file.

use crate::error::{DraftError, Result};
use serde::{Deserialize, Serialize};

/// Hard ceiling on per-participant bans.
pub const MAX_BANS_LIMIT: u32 = 10;
/// Hard ceiling on the per-participant pool size.
pub const POOL_SIZE_LIMIT: usize = 10;

/// Engine-level defaults for new sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftConfig {
    /// Ban ceiling applied when the creator does not specify one.
    #[serde(default = "default_max_bans")]
    pub default_max_bans: u32,
    /// Pool size applied when the creator does not specify one.
    #[serde(default = "default_pool_size")]
    pub default_pool_size: usize,
}

fn default_max_bans() -> u32 {
    2
}

fn default_pool_size() -> usize {
    3
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            default_max_bans: default_max_bans(),
            default_pool_size: default_pool_size(),
        }
    }
}

impl DraftConfig {
    /// Parses a config from TOML, then validates it.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: DraftConfig = toml::from_str(raw)?;
        validate_limits(config.default_max_bans, config.default_pool_size)?;
        Ok(config)
    }
}

/// Validates session creation parameters against the hard bounds.
///
/// # Errors
///
/// Returns [`DraftError::InvalidConfig`] when `max_bans` exceeds
/// [`MAX_BANS_LIMIT`] or `pool_size` is zero or exceeds [`POOL_SIZE_LIMIT`].
pub fn validate_limits(max_bans: u32, pool_size: usize) -> Result<()> {
    if max_bans > MAX_BANS_LIMIT {
        return Err(DraftError::invalid_config(format!(
            "max_bans must be between 0 and {MAX_BANS_LIMIT}, got {max_bans}"
        )));
    }
    if pool_size < 1 || pool_size > POOL_SIZE_LIMIT {
        return Err(DraftError::invalid_config(format!(
            "pool_size must be between 1 and {POOL_SIZE_LIMIT}, got {pool_size}"
        )));
    }
    Ok(())
}
