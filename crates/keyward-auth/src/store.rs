// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-limited key/value store for pending signups and reset codes.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Result of looking a key up in an [`ExpiringStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Missing,
    /// The entry existed but its lifetime had run out. It has been removed.
    Expired,
    Live(V),
}

/// A concurrent map whose entries expire a fixed time after insertion.
///
/// Expired entries are dropped lazily on lookup and in bulk by
/// [`purge_expired`](Self::purge_expired).
#[derive(Debug)]
pub struct ExpiringStore<V> {
    entries: DashMap<String, (V, Instant)>,
    ttl: Duration,
}

impl<V: Clone> ExpiringStore<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert or replace `key`, restarting its lifetime.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.entries
            .insert(key.into(), (value, Instant::now() + self.ttl));
    }

    /// Look `key` up without consuming it.
    pub fn get(&self, key: &str) -> Lookup<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            None => return Lookup::Missing,
            Some(entry) if entry.1 > now => return Lookup::Live(entry.0.clone()),
            Some(_) => {}
        }
        self.entries.remove_if(key, |_, (_, at)| *at <= now);
        Lookup::Expired
    }

    /// Look `key` up and remove it.
    pub fn take(&self, key: &str) -> Lookup<V> {
        match self.entries.remove(key) {
            None => Lookup::Missing,
            Some((_, (value, at))) if at > Instant::now() => Lookup::Live(value),
            Some(_) => Lookup::Expired,
        }
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (_, at)| *at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
