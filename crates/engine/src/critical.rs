// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Critical-section executor
//!
//! Every mutation of a shared record goes through [`CriticalPath::perform_critical`],
//! which runs a guarded read, precondition, mutate, persist, re-read,
//! postcondition cycle:
//!
//! 1. Read the resource. A read failure ends the section with an error.
//! 2. Check the precondition. `false` ends the section unsuccessfully but
//!    without an error: the work did not apply.
//! 3. Mutate an owned copy. A mutate error ends the section with an error
//!    and nothing is persisted; the partially mutated copy is dropped.
//! 4. Persist the copy when the section records a change, then re-read the
//!    resource either way so the caller sees the stored state.
//! 5. The postcondition over the re-read resource and the computed value
//!    decides `success`.
//!
//! Sections on the same `(kind, id)` are serialized within this process.
//! Nothing orders sections across processes; the store's version check
//! turns a lost race into [`CriticalError::Persist`], which is returned
//! to the caller and never retried here.

use ds_adapters::{ResourceClient, StoreError};
use ds_core::{Resource, ResourceKey};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::Instrument;

/// Error type a mutate step may fail with
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failure captured inside a critical section
#[derive(Debug, Error)]
pub enum CriticalError {
    #[error("reading {key} failed: {source}")]
    Read {
        key: ResourceKey,
        #[source]
        source: StoreError,
    },
    #[error("mutating {key} failed: {source}")]
    Mutate {
        key: ResourceKey,
        #[source]
        source: BoxError,
    },
    #[error("persisting {key} failed: {source}")]
    Persist {
        key: ResourceKey,
        #[source]
        source: StoreError,
    },
    #[error("re-reading {key} failed: {source}")]
    Reread {
        key: ResourceKey,
        #[source]
        source: StoreError,
    },
}

impl CriticalError {
    /// Another writer changed the record between our read and our write
    pub fn is_conflict(&self) -> bool {
        matches!(self, CriticalError::Persist { source, .. } if source.is_conflict())
    }
}

/// How a critical section ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Postcondition held
    Applied,
    /// Precondition or postcondition did not hold; nothing went wrong
    NotApplicable,
    /// A failure was captured
    Failed,
}

/// Result of one critical section
#[derive(Debug)]
pub struct CriticalResult<R, T> {
    /// The resource as last read (after the re-read when one happened)
    pub resource: Option<T>,
    /// Value computed by the mutate step, when it ran to completion
    pub result: Option<R>,
    pub success: bool,
    pub error: Option<CriticalError>,
}

impl<R, T> CriticalResult<R, T> {
    fn failed(resource: Option<T>, result: Option<R>, error: CriticalError) -> Self {
        Self {
            resource,
            result,
            success: false,
            error: Some(error),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match (&self.error, self.success) {
            (Some(_), _) => Outcome::Failed,
            (None, true) => Outcome::Applied,
            (None, false) => Outcome::NotApplicable,
        }
    }
}

/// Adapt a postcondition that only looks at the resource
pub fn resource_only<T, R>(
    check: impl FnOnce(&T) -> bool + Send,
) -> impl FnOnce(&T, Option<&R>) -> bool + Send {
    move |resource, _| check(resource)
}

type LockMap = HashMap<ResourceKey, Arc<tokio::sync::Mutex<()>>>;

/// Runs critical sections against a resource store
pub struct CriticalPath<C> {
    store: C,
    locks: Arc<Mutex<LockMap>>,
}

impl<C: Clone> Clone for CriticalPath<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<C: ResourceClient> CriticalPath<C> {
    pub fn new(store: C) -> Self {
        Self {
            store,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    /// Number of keys with a live lock entry
    pub fn held_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn lock_for(&self, key: &ResourceKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    fn release(&self, key: &ResourceKey, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Only the map and this caller hold it: nobody is waiting
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
    }

    /// Run one critical section over the resource `T` with id `id`.
    ///
    /// `mutate` receives an owned copy of the freshly read resource and
    /// returns the (possibly modified) copy plus a computed value. When
    /// `records_change` is set the returned copy is written back.
    pub async fn perform_critical<T, R, P, Q, M, Fut>(
        &self,
        id: &str,
        precondition: P,
        postcondition: Q,
        mutate: M,
        records_change: bool,
    ) -> CriticalResult<R, T>
    where
        T: Resource,
        R: Send,
        P: FnOnce(&T) -> bool + Send,
        Q: FnOnce(&T, Option<&R>) -> bool + Send,
        M: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = Result<(T, R), BoxError>> + Send,
    {
        let key = ResourceKey::of::<T>(id);
        let span = tracing::info_span!("critical", kind = T::KIND, id);

        async move {
            let lock = self.lock_for(&key);
            let result = {
                let _held = lock.lock().await;
                self.run_section(&key, precondition, postcondition, mutate, records_change)
                    .await
            };
            self.release(&key, lock);

            match (&result.error, result.success) {
                (Some(e), _) => tracing::warn!(error = %e, "critical section failed"),
                (None, true) => tracing::debug!("critical section applied"),
                (None, false) => tracing::debug!("critical section not applicable"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_section<T, R, P, Q, M, Fut>(
        &self,
        key: &ResourceKey,
        precondition: P,
        postcondition: Q,
        mutate: M,
        records_change: bool,
    ) -> CriticalResult<R, T>
    where
        T: Resource,
        R: Send,
        P: FnOnce(&T) -> bool + Send,
        Q: FnOnce(&T, Option<&R>) -> bool + Send,
        M: FnOnce(T) -> Fut + Send,
        Fut: Future<Output = Result<(T, R), BoxError>> + Send,
    {
        let current: T = match self.store.get(&key.id).await {
            Ok(resource) => resource,
            Err(source) => {
                let error = CriticalError::Read {
                    key: key.clone(),
                    source,
                };
                return CriticalResult::failed(None, None, error);
            }
        };

        if !precondition(&current) {
            tracing::debug!("precondition not met");
            return CriticalResult {
                resource: Some(current),
                result: None,
                success: false,
                error: None,
            };
        }

        let (updated, value) = match mutate(current.clone()).await {
            Ok(pair) => pair,
            Err(source) => {
                let error = CriticalError::Mutate {
                    key: key.clone(),
                    source,
                };
                return CriticalResult::failed(Some(current), None, error);
            }
        };

        let persisted = if records_change {
            self.store.update(&updated).await.map_err(|source| CriticalError::Persist {
                key: key.clone(),
                source,
            })
        } else {
            Ok(())
        };

        let reread = self
            .store
            .get::<T>(&key.id)
            .await
            .map_err(|source| CriticalError::Reread {
                key: key.clone(),
                source,
            });

        match (persisted, reread) {
            (Err(error), Ok(stored)) => CriticalResult::failed(Some(stored), Some(value), error),
            (Err(error), Err(_)) => CriticalResult::failed(Some(current), Some(value), error),
            (Ok(()), Err(error)) => CriticalResult::failed(Some(current), Some(value), error),
            (Ok(()), Ok(stored)) => {
                let success = postcondition(&stored, Some(&value));
                if !success {
                    tracing::info!("postcondition not met");
                }
                CriticalResult {
                    resource: Some(stored),
                    result: Some(value),
                    success,
                    error: None,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "critical_tests.rs"]
mod tests;
