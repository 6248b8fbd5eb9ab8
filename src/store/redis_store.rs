//! Redis-backed lock store.
//!
//! Conditional create is a single `SET key value NX PX ttl`. Compare-and-delete
//! runs as a Lua script on the server, so no other client can write the key
//! between the read and the delete.
//!
//! ## Example
//!
//! ```ignore
//! use kvlock::{LockClient, store::RedisStore};
//! use std::{sync::Arc, time::Duration};
//!
//! let store = RedisStore::connect("redis://localhost:6379").await?;
//! let client = LockClient::new(Arc::new(store));
//! let lock = client.try_lock("job-42", Duration::from_secs(60)).await?;
//! lock.release().await?;
//! ```

use super::{LockStore, MAX_TTL};
use crate::error::StoreError;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError, Script};
use std::sync::LazyLock;
use std::time::Duration;

/// Delete KEYS[1] only while it still holds ARGV[1]; replies with the number
/// of deleted keys.
const UNLOCK_LUA: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

static UNLOCK_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(UNLOCK_LUA));

/// Lock store talking to a single Redis node.
///
/// Cloning is cheap: clones share the same managed, auto-reconnecting
/// multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Open a connection manager for the Redis server at `url`
    /// (e.g. `redis://localhost:6379`).
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(|e| {
            StoreError::Connection(format!("invalid redis url '{}': {}", url, e))
        })?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(classify_error)?;

        tracing::debug!(url = %url, "connected to redis lock store");
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already established connection manager.
    pub fn from_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl LockStore for RedisStore {
    async fn conditional_create(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();

        // SET ... NX replies OK when written and nil when the key exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(classify_error)?;

        Ok(reply.is_some())
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();

        let deleted: Option<i64> = UNLOCK_SCRIPT
            .key(key)
            .arg(expected)
            .invoke_async(&mut conn)
            .await
            .map_err(classify_error)?;

        match deleted {
            None => Err(StoreError::KeyAbsent(key.to_string())),
            Some(n) if n >= 0 => Ok(n as u64),
            Some(n) => Err(StoreError::Protocol(format!(
                "unlock script returned a negative delete count: {}",
                n
            ))),
        }
    }
}

/// Redis expiry granularity is one millisecond; never send `PX 0` and never
/// exceed [`MAX_TTL`], which Redis would reject as an invalid expire time.
fn ttl_millis(ttl: Duration) -> u64 {
    // MAX_TTL in milliseconds is far below u64::MAX.
    (ttl.min(MAX_TTL).as_millis() as u64).max(1)
}

fn classify_error(e: RedisError) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout(e.to_string())
    } else if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
        StoreError::Connection(e.to_string())
    } else {
        StoreError::Protocol(e.to_string())
    }
}
