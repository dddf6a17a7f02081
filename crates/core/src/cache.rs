// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-scoped lookup cache
//!
//! Built once at startup and handed to the components that need it.
//! Entries are cloned out, so callers never share a mutable value.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Read-mostly cache keyed by record id
#[derive(Debug)]
pub struct LookupCache<V> {
    entries: Arc<RwLock<HashMap<String, V>>>,
}

impl<V> Clone for LookupCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for LookupCache<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V: Clone> LookupCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    pub fn insert(&self, id: impl Into<String>, value: V) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.into(), value);
    }

    /// Drop a stale entry so the next lookup reloads it
    pub fn invalidate(&self, id: &str) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
