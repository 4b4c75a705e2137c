//! Cache Store Module
//!
//! Owned key-value map with per-entry deadlines. Locking lives one layer up in
//! `MemoryCache`; everything here is plain single-owner state.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::cache::CacheEntry;

// == Expiring Store ==
/// Key-value storage with lazy expiry on read and an explicit purge.
#[derive(Debug, Default)]
pub struct ExpiringStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl ExpiringStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a value with no expiration, replacing any previous entry and
    /// its deadline.
    pub fn set(&mut self, key: String, value: String) {
        self.entries.insert(key, CacheEntry::persistent(value));
    }

    // == Set With Expire ==
    /// Stores a value that expires `ttl_seconds` from now.
    pub fn set_with_expire(&mut self, key: String, value: String, ttl_seconds: u64) {
        let entry = CacheEntry::expiring(value, ttl_seconds, Instant::now());
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Returns the value if present and not expired.
    ///
    /// Expired entries are left in place for the sweep to remove.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_at(key, Instant::now())
    }

    /// Same as [`get`](Self::get) against an explicit clock reading.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<&str> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value.as_str())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Flush ==
    /// Removes every entry.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    // == Purge Expired ==
    /// Removes all entries whose deadline has passed.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// Same as [`purge_expired`](Self::purge_expired) against an explicit clock reading.
    pub fn purge_expired_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
