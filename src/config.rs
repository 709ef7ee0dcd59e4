//! Engine configuration
//!
//! Configuration is plain data with serde support so hosts can load it from
//! the same JSON files they use for the rest of the runtime.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default upper bound for preallocating dense storage of a new array
pub const DEFAULT_DENSE_PREALLOC_LIMIT: u32 = 64 * 1024;

/// Array engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether routines may operate directly on dense buffers.
    /// When off, every routine goes through the generic property protocol.
    pub fast_paths: bool,
    /// New arrays created with a length hint up to this size get dense
    /// storage; larger ones start out sparse.
    pub dense_prealloc_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fast_paths: true,
            dense_prealloc_limit: DEFAULT_DENSE_PREALLOC_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Configuration that forces the generic path everywhere
    pub fn generic_only() -> Self {
        Self {
            fast_paths: false,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }
}
