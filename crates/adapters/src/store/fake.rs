// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory resource store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ResourceClient, StoreError};
use async_trait::async_trait;
use ds_core::Resource;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

/// Store operation, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    Create,
    Update,
    Select,
}

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub kind: &'static str,
    pub id: Option<String>,
}

#[derive(Default)]
struct FakeStoreState {
    // Records are kept serialized so every read is a fresh copy
    records: BTreeMap<(&'static str, String), Value>,
    calls: Vec<StoreCall>,
    failures: HashSet<(StoreOp, String)>,
    failing_selects: HashSet<&'static str>,
}

/// In-memory [`ResourceClient`] with call recording and failure injection
#[derive(Clone, Default)]
pub struct FakeResourceClient {
    state: Arc<Mutex<FakeStoreState>>,
}

impl FakeResourceClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeStoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a record without recording a call
    pub fn put<T: Resource>(&self, resource: &T) {
        let value = serde_json::to_value(resource).unwrap_or(Value::Null);
        self.lock()
            .records
            .insert((T::KIND, resource.id().to_string()), value);
    }

    /// Current stored copy of a record
    pub fn snapshot<T: Resource>(&self, id: &str) -> Option<T> {
        self.lock()
            .records
            .get(&(T::KIND, id.to_string()))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Number of records of a kind
    pub fn count<T: Resource>(&self) -> usize {
        self.lock()
            .records
            .keys()
            .filter(|(kind, _)| *kind == T::KIND)
            .count()
    }

    /// Modify a record behind the client's back, as another process would.
    /// Bumps the stored version.
    pub fn external_update<T: Resource>(&self, id: &str, f: impl FnOnce(&mut T)) {
        if let Some(mut resource) = self.snapshot::<T>(id) {
            f(&mut resource);
            resource.set_version(resource.version() + 1);
            self.put(&resource);
        }
    }

    /// Make every `op` against `id` fail until cleared
    pub fn fail(&self, op: StoreOp, id: &str) {
        self.lock().failures.insert((op, id.to_string()));
    }

    /// Make `select` over a kind fail until cleared
    pub fn fail_select<T: Resource>(&self) {
        self.lock().failing_selects.insert(T::KIND);
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.failures.clear();
        state.failing_selects.clear();
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Number of successful-or-not update calls against one id
    pub fn update_calls(&self, id: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.op == StoreOp::Update && c.id.as_deref() == Some(id))
            .count()
    }

    fn record(
        &self,
        state: &mut FakeStoreState,
        op: StoreOp,
        kind: &'static str,
        id: &str,
    ) -> Result<(), StoreError> {
        state.calls.push(StoreCall {
            op,
            kind,
            id: Some(id.to_string()),
        });
        if state.failures.contains(&(op, id.to_string())) {
            return Err(StoreError::Unavailable(format!(
                "injected {:?} failure for {}/{}",
                op, kind, id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceClient for FakeResourceClient {
    async fn get<T: Resource>(&self, id: &str) -> Result<T, StoreError> {
        let mut state = self.lock();
        self.record(&mut state, StoreOp::Get, T::KIND, id)?;

        let value = state
            .records
            .get(&(T::KIND, id.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            })?;
        Ok(serde_json::from_value(value)?)
    }

    async fn create<T: Resource>(&self, resource: &T) -> Result<(), StoreError> {
        let mut state = self.lock();
        self.record(&mut state, StoreOp::Create, T::KIND, resource.id())?;

        let key = (T::KIND, resource.id().to_string());
        if state.records.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                kind: T::KIND,
                id: resource.id().to_string(),
            });
        }
        state.records.insert(key, serde_json::to_value(resource)?);
        Ok(())
    }

    async fn update<T: Resource>(&self, resource: &T) -> Result<(), StoreError> {
        let mut state = self.lock();
        self.record(&mut state, StoreOp::Update, T::KIND, resource.id())?;

        let key = (T::KIND, resource.id().to_string());
        let stored: T = match state.records.get(&key) {
            Some(value) => serde_json::from_value(value.clone())?,
            None => {
                return Err(StoreError::NotFound {
                    kind: T::KIND,
                    id: resource.id().to_string(),
                })
            }
        };
        if stored.version() != resource.version() {
            return Err(StoreError::Conflict {
                kind: T::KIND,
                id: resource.id().to_string(),
                expected: resource.version(),
                found: stored.version(),
            });
        }

        let mut next = resource.clone();
        next.set_version(resource.version() + 1);
        state.records.insert(key, serde_json::to_value(&next)?);
        Ok(())
    }

    async fn select<T: Resource>(
        &self,
        filter: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Vec<T>, StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall {
            op: StoreOp::Select,
            kind: T::KIND,
            id: None,
        });
        if state.failing_selects.contains(T::KIND) {
            return Err(StoreError::Unavailable(format!(
                "injected select failure for {}",
                T::KIND
            )));
        }

        let mut matches = Vec::new();
        for ((kind, _), value) in &state.records {
            if *kind != T::KIND {
                continue;
            }
            let resource: T = serde_json::from_value(value.clone())?;
            if filter(&resource) {
                matches.push(resource);
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
