//! In-process rate-limit store
//!
//! Entries live in a `DashMap` with an optional expiry timestamp. Expired
//! entries are hidden on read and removed by a periodic sweep.
//!
//! `increment` is a read followed by a write. Two callers can interleave
//! between the two steps and lose an update, so the effective limit may be
//! exceeded under contention. This is acceptable for a single instance only;
//! deployments that share load across processes must use the Redis store.

use super::RateLimitStore;
use crate::core::clock::Clock;
use crate::utils::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at_ms: Option<u64>,
}

impl Entry {
    fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms.is_some_and(|at| at <= now_ms)
    }
}

/// Best-effort in-memory store for single-instance deployments
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
}

impl MemoryStore {
    /// Create a store without a background sweeper
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            shutdown: CancellationToken::new(),
        }
    }

    /// Create a store and start sweeping expired entries every `interval`.
    ///
    /// The sweeper stops on [`shutdown`](Self::shutdown) or once the last
    /// handle to the store is dropped. Must be called inside a tokio runtime.
    pub fn with_sweeper(clock: Arc<dyn Clock>, interval: Duration) -> Arc<Self> {
        let store = Arc::new(Self::new(clock));
        let weak: Weak<Self> = Arc::downgrade(&store);
        let shutdown = store.shutdown.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        match weak.upgrade() {
                            Some(store) => {
                                let removed = store.sweep();
                                if removed > 0 {
                                    debug!(removed, "Swept expired rate limit entries");
                                }
                            }
                            None => break,
                        }
                    }
                }
            }
            debug!("Memory store sweeper stopped");
        });

        store
    }

    /// Remove expired entries, returning how many were dropped
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Stop the sweeper and drop all entries
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn expiry(&self, ttl_secs: Option<u64>) -> Option<u64> {
        ttl_secs.map(|ttl| self.clock.now_ms().saturating_add(ttl.saturating_mul(1000)))
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now_ms();
        let entry = self.entries.get(key)?.clone();
        if entry.is_expired(now) {
            self.entries.remove_if(key, |_, e| e.is_expired(now));
            return None;
        }
        Some(entry.value)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) {
        let entry = Entry {
            value: value.to_string(),
            expires_at_ms: self.expiry(ttl_secs),
        };
        self.entries.insert(key.to_string(), entry);
    }

    async fn increment(&self, key: &str, ttl_secs: Option<u64>) -> Result<i64> {
        let current = match self.get(key).await {
            Some(raw) => raw.parse::<i64>().unwrap_or_else(|_| {
                warn!(key, value = %raw, "Non-numeric counter in memory store, restarting at 0");
                0
            }),
            None => 0,
        };
        let next = current + 1;
        self.set(key, &next.to_string(), ttl_secs).await;
        Ok(next)
    }
}
