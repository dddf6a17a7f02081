// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned resources held in the shared store

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record that lives in the resource store.
///
/// Every record carries a version number used for optimistic concurrency:
/// the store rejects an update whose version does not match the stored one.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Store-level type name (e.g. "deposit")
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn version(&self) -> u64;

    fn set_version(&mut self, version: u64);
}

/// Identifies one resource in the store: its kind plus its id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub kind: &'static str,
    pub id: String,
}

impl ResourceKey {
    pub fn of<T: Resource>(id: impl Into<String>) -> Self {
        Self {
            kind: T::KIND,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}
