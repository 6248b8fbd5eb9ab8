//! In-process lock store.
//!
//! Records live in a single mutex-protected map, so both store operations are
//! trivially atomic. Expiry is measured on the tokio clock, which lets tests
//! pause time and advance past a TTL without sleeping.

use super::{LockStore, MAX_TTL};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Record {
    value: String,
    expires_at: Instant,
}

/// Deadline for a record written at `now`; lifetimes past [`MAX_TTL`] are
/// clamped to it.
fn expiry(now: Instant, ttl: Duration) -> Instant {
    now + ttl.min(MAX_TTL)
}

impl Record {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Key-value store kept in memory, with the same atomicity and TTL behavior a
/// networked broker provides.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Record>>,
    offline: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value at `key`, ignoring expired records.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.records()
            .get(key)
            .filter(|r| r.is_live(now))
            .map(|r| r.value.clone())
    }

    /// Remaining lifetime of the record at `key`.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.records()
            .get(key)
            .filter(|r| r.is_live(now))
            .map(|r| r.expires_at - now)
    }

    /// Write `key -> value` unconditionally, replacing any existing record.
    ///
    /// Used to seed records owned by some other party.
    pub fn insert(&self, key: &str, value: &str, ttl: Duration) {
        self.records().insert(
            key.to_string(),
            Record {
                value: value.to_string(),
                expires_at: expiry(Instant::now(), ttl),
            },
        );
    }

    /// When set, every request fails with [`StoreError::Connection`] and
    /// leaves the records untouched.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay every request by `latency` before it reaches the records.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().unwrap_or_else(|p| p.into_inner()) = latency;
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, Record>> {
        // A panic while holding the guard cannot leave a half-written record.
        self.records.lock().unwrap_or_else(|p| p.into_inner())
    }

    async fn round_trip(&self) -> Result<(), StoreError> {
        let latency = *self.latency.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LockStore for MemoryStore {
    async fn conditional_create(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        self.round_trip().await?;

        let now = Instant::now();
        let mut records = self.records();
        if records.get(key).is_some_and(|r| r.is_live(now)) {
            return Ok(false);
        }
        records.insert(
            key.to_string(),
            Record {
                value: value.to_string(),
                expires_at: expiry(now, ttl),
            },
        );
        Ok(true)
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<u64, StoreError> {
        self.round_trip().await?;

        let now = Instant::now();
        let mut records = self.records();
        match records.get(key) {
            Some(r) if r.is_live(now) && r.value == expected => {
                records.remove(key);
                Ok(1)
            }
            Some(r) if !r.is_live(now) => {
                records.remove(key);
                Ok(0)
            }
            _ => Ok(0),
        }
    }
}
