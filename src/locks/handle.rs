//! Lock handle and owner-checked release.

use super::with_deadline;
use crate::error::{LockError, Result, StoreError};
use crate::store::LockStore;
use std::sync::Arc;
use std::time::Duration;

/// Proof of one successful acquisition.
///
/// Binds the store, the lock key and the ownership token written at
/// acquisition. Immutable; whether the lock is still held is only ever
/// decided by the store when [`Lock::release`] runs.
pub struct Lock {
    store: Arc<dyn LockStore>,
    key: String,
    token: String,
    request_timeout: Option<Duration>,
}

impl Lock {
    pub(super) fn new(
        store: Arc<dyn LockStore>,
        key: String,
        token: String,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self {
            store,
            key,
            token,
            request_timeout,
        }
    }

    /// The contested resource this lock was taken on.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The ownership token stored as the record's value.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Release the lock if this handle still owns it.
    ///
    /// Runs a single atomic compare-and-delete at the store. Calling it again
    /// after a successful release is harmless and yields `NotHeld`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The record carried our token and was deleted
    /// * `Err(LockError::NotHeld)` - The record expired, was already released,
    ///   or now belongs to another owner; nothing was deleted
    /// * `Err(LockError::StoreUnavailable)` - The store failed or timed out
    pub async fn release(&self) -> Result<()> {
        let deleted = with_deadline(
            self.request_timeout,
            self.store.compare_and_delete(&self.key, &self.token),
        )
        .await;

        match deleted {
            Ok(1) => {
                tracing::debug!(key = %self.key, "lock released");
                Ok(())
            }
            Ok(0) | Err(StoreError::KeyAbsent(_)) => {
                tracing::debug!(key = %self.key, "release found no record owned by this handle");
                Err(LockError::NotHeld(self.key.clone()))
            }
            Ok(n) => Err(StoreError::Protocol(format!(
                "compare-and-delete on '{}' removed {} keys",
                self.key, n
            ))
            .into()),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "lock release failed");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for Lock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lock")
            .field("key", &self.key)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Lock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}
