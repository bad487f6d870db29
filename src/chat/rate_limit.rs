//! Per-client fixed-window request limiting.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

/// Windows an idle entry survives before a sweep may drop it.
const STALE_AFTER_WINDOWS: u32 = 5;
/// Share of requests that trigger a sweep.
const SWEEP_PROBABILITY: f64 = 0.01;

/// Counter state keyed by client; swap in a shared cache for multi-instance deployments.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Counts a request from `key`; `false` once the key is over its limit.
    async fn check(&self, key: &str) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: u32,
    window_start: Instant,
}

pub struct InMemoryRateLimiter {
    limit: u32,
    window: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryRateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        // a poisoned map only holds counters; keep using it
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        if rand::thread_rng().gen_bool(SWEEP_PROBABILITY) {
            self.sweep(&mut entries, now);
        }

        let entry = entries.entry(key.to_string()).or_insert(Entry {
            count: 0,
            window_start: now,
        });
        if now.saturating_duration_since(entry.window_start) >= self.window {
            *entry = Entry {
                count: 0,
                window_start: now,
            };
        }
        entry.count += 1;
        entry.count <= self.limit
    }

    fn sweep(&self, entries: &mut HashMap<String, Entry>, now: Instant) {
        let stale = self.window * STALE_AFTER_WINDOWS;
        let before = entries.len();
        entries.retain(|_, e| now.saturating_duration_since(e.window_start) < stale);
        debug!(removed = before - entries.len(), "rate limiter sweep");
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }
}
