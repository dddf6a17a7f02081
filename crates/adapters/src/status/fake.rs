// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake status resolver for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ResolveError, StatusResolver};
use async_trait::async_trait;
use ds_core::ParsedState;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeResolverState {
    states: HashMap<String, ParsedState>,
    failing: HashSet<String>,
    calls: Vec<String>,
}

/// Resolver answering from a scripted table of references.
/// Unscripted references resolve to [`ParsedState::InProgress`].
#[derive(Clone, Default)]
pub struct FakeStatusResolver {
    inner: Arc<Mutex<FakeResolverState>>,
}

impl FakeStatusResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the state a reference resolves to
    pub fn set_state(&self, status_ref: &str, state: ParsedState) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.failing.remove(status_ref);
        inner.states.insert(status_ref.to_string(), state);
    }

    /// Make resolving a reference fail
    pub fn fail(&self, status_ref: &str) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failing
            .insert(status_ref.to_string());
    }

    /// References resolved so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

#[async_trait]
impl StatusResolver for FakeStatusResolver {
    async fn resolve(&self, status_ref: &str) -> Result<ParsedState, ResolveError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(status_ref.to_string());
        if inner.failing.contains(status_ref) {
            return Err(ResolveError::Fetch {
                reference: status_ref.to_string(),
                reason: "injected".to_string(),
            });
        }
        Ok(inner
            .states
            .get(status_ref)
            .cloned()
            .unwrap_or(ParsedState::InProgress))
    }
}
