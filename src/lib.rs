//! kvlock: distributed mutual exclusion over a single key-value store.
//!
//! Independent processes coordinate exclusive access to a named resource
//! through one shared store, with no direct communication between them.
//! A lock is one store record `key -> token` with a TTL:
//!
//! - [`LockClient::try_lock`] creates the record only if it is absent
//! - [`Lock::release`] deletes it only if it still carries the handle's token
//!
//! Both steps are single atomic store operations (see [`store::LockStore`]).
//! Acquisition never waits or retries, and held locks are never renewed.
//!
//! ```no_run
//! use kvlock::store::MemoryStore;
//! use kvlock::{LockClient, LockError};
//! use std::sync::Arc;
//!
//! # async fn run() -> kvlock::Result<()> {
//! // With the `redis` feature, `LockClient::connect(&LockConfig)` targets a server.
//! let client = LockClient::new(Arc::new(MemoryStore::new()));
//! match client.try_lock_default("job-42").await {
//!     Ok(lock) => {
//!         // critical section
//!         lock.release().await?;
//!     }
//!     Err(LockError::Contended(_)) => { /* someone else is on it */ }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod locks;
pub mod store;

pub use config::LockConfig;
pub use error::{LockError, Result, StoreError};
pub use locks::{Lock, LockClient};
