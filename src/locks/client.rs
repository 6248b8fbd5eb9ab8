//! Lock acquisition.

use super::handle::Lock;
use super::with_deadline;
use crate::config::LockConfig;
use crate::error::{LockError, Result};
use crate::store::{LockStore, MAX_TTL};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Stateless entry point for acquiring locks against one store.
///
/// Cloning shares the underlying store.
#[derive(Clone)]
pub struct LockClient {
    store: Arc<dyn LockStore>,
    default_ttl: Duration,
    request_timeout: Option<Duration>,
}

impl LockClient {
    /// Create a client with the default TTL and no request deadline.
    pub fn new(store: Arc<dyn LockStore>) -> Self {
        Self {
            store,
            default_ttl: LockConfig::default().default_ttl(),
            request_timeout: None,
        }
    }

    /// Create a client using the TTL and deadline from `config`.
    pub fn from_config(store: Arc<dyn LockStore>, config: &LockConfig) -> Self {
        Self {
            store,
            default_ttl: config.default_ttl(),
            request_timeout: Some(config.request_timeout()),
        }
    }

    /// Connect to the Redis server named by `config.store_url`.
    #[cfg(feature = "redis")]
    pub async fn connect(config: &LockConfig) -> Result<Self> {
        config.validate()?;
        let store = with_deadline(
            Some(config.request_timeout()),
            crate::store::RedisStore::connect(&config.store_url),
        )
        .await?;
        Ok(Self::from_config(Arc::new(store), config))
    }

    /// Abandon any single store request that takes longer than `timeout`.
    ///
    /// Handles acquired through this client inherit the deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// TTL used by [`LockClient::try_lock_default`].
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// The TTL applied by [`LockClient::try_lock_default`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Make one non-blocking attempt to acquire `key` for `ttl`.
    ///
    /// Generates a fresh ownership token and asks the store to create
    /// `key -> token` only if `key` is absent. There is no retry or wait;
    /// retry policy belongs to the caller.
    ///
    /// # Returns
    ///
    /// * `Ok(Lock)` - The record was created; the handle owns it
    /// * `Err(LockError::Contended)` - The key is already held
    /// * `Err(LockError::StoreUnavailable)` - The store failed or timed out
    /// * `Err(LockError::InvalidArgument)` - Empty key, or TTL zero or above
    ///   [`MAX_TTL`]
    pub async fn try_lock(&self, key: &str, ttl: Duration) -> Result<Lock> {
        if key.is_empty() {
            return Err(LockError::InvalidArgument(
                "lock key must not be empty".to_string(),
            ));
        }
        if ttl.is_zero() {
            return Err(LockError::InvalidArgument(format!(
                "lock '{}' needs a TTL greater than zero",
                key
            )));
        }
        if ttl > MAX_TTL {
            return Err(LockError::InvalidArgument(format!(
                "lock '{}' TTL {:?} exceeds the maximum of {:?}",
                key, ttl, MAX_TTL
            )));
        }

        let token = Uuid::new_v4().to_string();
        let created = with_deadline(
            self.request_timeout,
            self.store.conditional_create(key, &token, ttl),
        )
        .await
        .map_err(|e| {
            tracing::warn!(key = %key, error = %e, "lock acquisition failed");
            LockError::from(e)
        })?;

        if !created {
            tracing::debug!(key = %key, "lock is held by another owner");
            return Err(LockError::Contended(key.to_string()));
        }

        tracing::debug!(key = %key, ttl = ?ttl, "lock acquired");
        tracing::trace!(key = %key, token = %token, "lock token issued");
        Ok(Lock::new(
            Arc::clone(&self.store),
            key.to_string(),
            token,
            self.request_timeout,
        ))
    }

    /// [`LockClient::try_lock`] with the client's default TTL.
    pub async fn try_lock_default(&self, key: &str) -> Result<Lock> {
        self.try_lock(key, self.default_ttl).await
    }
}

impl std::fmt::Debug for LockClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockClient")
            .field("default_ttl", &self.default_ttl)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
