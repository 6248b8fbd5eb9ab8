//! Config struct definition and default implementation.

use serde::{Deserialize, Serialize};

/// Settings shared by every lock client built from the same deployment.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Connection URL of the lock store (default: `redis://127.0.0.1:6379`).
    #[serde(default = "default_store_url")]
    pub store_url: String,

    /// TTL in seconds used by `try_lock_default` (default: 30).
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Deadline for a single store round trip, in milliseconds (default: 1000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

pub(crate) fn default_store_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}
pub(crate) fn default_ttl_secs() -> u64 {
    30
}
pub(crate) fn default_request_timeout_ms() -> u64 {
    1000
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            store_url: default_store_url(),
            default_ttl_secs: default_ttl_secs(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}
