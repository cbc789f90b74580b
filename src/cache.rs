//! In-memory result cache with a fixed time-to-live.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::result::OptimizationResult;

#[derive(Debug)]
struct Entry {
    stored_at: Instant,
    result: OptimizationResult,
}

/// Stores optimization results by request key.
///
/// Lookups never run the optimizer; two concurrent misses for the same key
/// both compute and the later insert wins.
#[derive(Debug)]
pub struct RouteCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl RouteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The stored result for `key`, unless it has expired.
    pub fn get(&self, key: &str) -> Option<OptimizationResult> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: String, result: OptimizationResult) {
        self.insert_at(key, result, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<OptimizationResult> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            Some(entry) if now.duration_since(entry.stored_at) < self.ttl => {
                return Some(entry.result.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    /// Stores `result` and drops every entry that has expired by `now`.
    fn insert_at(&self, key: String, result: OptimizationResult, now: Instant) {
        let mut entries = self.lock();
        entries.retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);
        entries.insert(
            key,
            Entry {
                stored_at: now,
                result,
            },
        );
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
