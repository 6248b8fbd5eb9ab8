//! Store capability consumed by the lock protocol.
//!
//! The lock never talks to a concrete database directly. It needs exactly two
//! operations, both of which must be atomic at the store:
//! - **conditional create**: write `key -> value` with an expiry only if the
//!   key is absent
//! - **compare and delete**: remove `key` only if its current value equals the
//!   expected one, reporting how many keys were removed
//!
//! # Backends
//!
//! - [`MemoryStore`]: in-process fake with tokio-clock TTLs, used by tests
//! - [`RedisStore`]: `SET NX PX` plus a server-side Lua script (feature `redis`)

mod memory;
#[cfg(feature = "redis")]
mod redis_store;

use crate::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

pub use memory::MemoryStore;

/// Longest lifetime a lock record may be given: 100 years.
///
/// Fits both a monotonic clock deadline and a Redis `PX` argument.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;

/// Atomic operations a key-value store must provide to act as a lock broker.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Create `key -> value` expiring after `ttl`, only if `key` does not exist.
    ///
    /// Returns `true` when the record was created, `false` when the key was
    /// already present and nothing was written.
    async fn conditional_create(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError>;

    /// Delete `key` only if its current value equals `expected`.
    ///
    /// Returns the number of deleted keys (0 or 1). The read, comparison and
    /// delete must happen as one indivisible unit at the store. A backend may
    /// report a missing key as [`StoreError::KeyAbsent`] instead of `0`.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<u64, StoreError>;
}
