// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource store clients

mod fs;

pub use fs::FsResourceClient;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeResourceClient, StoreCall, StoreOp};

use async_trait::async_trait;
use ds_core::Resource;
use thiserror::Error;

/// Errors from resource store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {kind}/{id}")]
    NotFound { kind: &'static str, id: String },
    #[error("already exists: {kind}/{id}")]
    AlreadyExists { kind: &'static str, id: String },
    #[error("version conflict on {kind}/{id}: expected {expected}, found {found}")]
    Conflict {
        kind: &'static str,
        id: String,
        expected: u64,
        found: u64,
    },
    #[error("invalid id: {0:?}")]
    InvalidId(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Client for the shared resource store.
///
/// Reads always hand back a fresh copy. `update` is optimistic: it fails
/// with [`StoreError::Conflict`] when the stored version differs from the
/// version carried by the resource, and bumps the stored version otherwise.
#[async_trait]
pub trait ResourceClient: Clone + Send + Sync + 'static {
    /// Read a resource by id
    async fn get<T: Resource>(&self, id: &str) -> Result<T, StoreError>;

    /// Store a new resource
    async fn create<T: Resource>(&self, resource: &T) -> Result<(), StoreError>;

    /// Replace an existing resource
    async fn update<T: Resource>(&self, resource: &T) -> Result<(), StoreError>;

    /// All resources of a kind matching a filter, ordered by id
    async fn select<T: Resource>(
        &self,
        filter: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Vec<T>, StoreError>;
}
