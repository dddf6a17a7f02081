// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared context for deposit work

use crate::critical::CriticalPath;
use crate::handler::{DepositFailure, ErrorHandler, FailureKind};
use crate::registry::PackagerRegistry;
use ds_adapters::{ResourceClient, StatusResolver, StoreError};
use ds_core::{IdGen, LookupCache, Repository, UuidIdGen};
use std::sync::Arc;

/// Everything deposit work needs, constructed once at startup and cloned
/// into each task
pub struct DepositServices<C> {
    pub store: C,
    pub critical: CriticalPath<C>,
    pub registry: Arc<PackagerRegistry>,
    pub resolver: Arc<dyn StatusResolver>,
    pub errors: Arc<dyn ErrorHandler>,
    /// Repositories rarely change; read through this cache
    pub repositories: LookupCache<Repository>,
    pub ids: Arc<dyn IdGen>,
    /// Resolve a deposit's status right after submitting it
    pub resolve_synchronously: bool,
}

impl<C: Clone> Clone for DepositServices<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            critical: self.critical.clone(),
            registry: Arc::clone(&self.registry),
            resolver: Arc::clone(&self.resolver),
            errors: Arc::clone(&self.errors),
            repositories: self.repositories.clone(),
            ids: Arc::clone(&self.ids),
            resolve_synchronously: self.resolve_synchronously,
        }
    }
}

impl<C: ResourceClient> DepositServices<C> {
    pub fn new(
        store: C,
        registry: PackagerRegistry,
        resolver: Arc<dyn StatusResolver>,
        errors: Arc<dyn ErrorHandler>,
    ) -> Self {
        Self {
            critical: CriticalPath::new(store.clone()),
            store,
            registry: Arc::new(registry),
            resolver,
            errors,
            repositories: LookupCache::new(),
            ids: Arc::new(UuidIdGen),
            resolve_synchronously: false,
        }
    }

    pub fn with_id_gen(mut self, ids: impl IdGen) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn with_synchronous_resolution(mut self, enabled: bool) -> Self {
        self.resolve_synchronously = enabled;
        self
    }

    /// Look up a repository, reading the store on a cache miss
    pub async fn repository(&self, id: &str) -> Result<Repository, StoreError> {
        if let Some(repository) = self.repositories.get(id) {
            return Ok(repository);
        }
        let repository: Repository = self.store.get(id).await?;
        self.repositories.insert(id, repository.clone());
        Ok(repository)
    }

    /// Hand a failure to the error handler
    pub fn report(&self, deposit: &str, kind: FailureKind, message: impl Into<String>) {
        self.errors.handle(&DepositFailure::new(deposit, kind, message));
    }
}
