//! Locking subsystem for kvlock.
//!
//! This module implements a single-store, non-renewing exclusive lock:
//! - [`LockClient`] makes one atomic "create if absent, with TTL" attempt
//! - [`Lock`] is the handle returned on success and carries the ownership token
//!
//! # Lock Records
//!
//! A held lock is exactly one store record `key -> token` with a store-managed
//! expiry. The token is a fresh random UUID per acquisition and is the only
//! proof of ownership, so a release issued from any process or host is checked
//! the same way.
//!
//! # Release
//!
//! Release is a compare-and-delete executed atomically by the store. A handle
//! whose record expired, or was taken over by another owner after expiry,
//! gets [`LockError::NotHeld`](crate::error::LockError::NotHeld) and never
//! deletes the newer owner's record.
//!
//! # No Auto Release
//!
//! Handles are not RAII guards. Dropping one does nothing; the TTL reclaims a
//! forgotten record.

mod client;
mod handle;


// Re-export public API
pub use client::LockClient;
pub use handle::Lock;

use crate::error::StoreError;
use std::time::Duration;

/// Run one store request, abandoning it once `timeout` elapses.
///
/// A request cut short by the deadline is reported as
/// [`StoreError::Timeout`], never as a success.
pub(crate) async fn with_deadline<T, F>(
    timeout: Option<Duration>,
    request: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match timeout {
        None => request.await,
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .map_err(|_| StoreError::Timeout(format!("no reply within {:?}", limit)))?,
    }
}
