// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DepositMetadata, Receipt, Transport, TransportError, TransportSession};
use crate::assemble::PackageStream;
use async_trait::async_trait;
use ds_core::ConnectionHints;
use std::sync::{Arc, Mutex};

/// Recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Open { collection: Option<String> },
    Deposit { deposit_id: String, package: String },
}

/// Scripted behavior of the next calls
#[derive(Debug, Clone, Default)]
enum Behavior {
    #[default]
    Accept,
    FailOpen(String),
    Reject(String),
    Receipt(Receipt),
}

#[derive(Default)]
struct FakeTransportState {
    calls: Vec<TransportCall>,
    behavior: Behavior,
}

/// Transport that accepts every package and hands out
/// `fake://status/<deposit id>` references
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeTransportState>>,
}

struct FakeSession {
    inner: Arc<Mutex<FakeTransportState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status reference handed out for a deposit
    pub fn status_ref_for(deposit_id: &str) -> String {
        format!("fake://status/{}", deposit_id)
    }

    fn set(&self, behavior: Behavior) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).behavior = behavior;
    }

    /// Fail opening sessions with a network error
    pub fn fail_open(&self, message: &str) {
        self.set(Behavior::FailOpen(message.to_string()));
    }

    /// Reject deposits at the protocol level
    pub fn reject(&self, message: &str) {
        self.set(Behavior::Reject(message.to_string()));
    }

    /// Answer deposits with a fixed receipt
    pub fn respond_with(&self, receipt: Receipt) {
        self.set(Behavior::Receipt(receipt));
    }

    /// Go back to accepting deposits
    pub fn accept(&self) {
        self.set(Behavior::Accept);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Deposit ids in the order they were deposited
    pub fn deposited(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Deposit { deposit_id, .. } => Some(deposit_id),
                TransportCall::Open { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn open(
        &self,
        hints: &ConnectionHints,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(TransportCall::Open {
            collection: hints.collection.clone(),
        });
        if let Behavior::FailOpen(message) = &inner.behavior {
            return Err(TransportError::Network(message.clone()));
        }
        Ok(Box::new(FakeSession {
            inner: Arc::clone(&self.inner),
        }))
    }
}

#[async_trait]
impl TransportSession for FakeSession {
    async fn deposit(
        &self,
        package: &PackageStream,
        metadata: &DepositMetadata,
    ) -> Result<Receipt, TransportError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(TransportCall::Deposit {
            deposit_id: metadata.deposit_id.clone(),
            package: package.name.clone(),
        });
        match &inner.behavior {
            Behavior::Reject(message) => Err(TransportError::Rejected(message.clone())),
            Behavior::Receipt(receipt) => Ok(receipt.clone()),
            Behavior::Accept | Behavior::FailOpen(_) => Ok(Receipt::accepted(
                FakeTransport::status_ref_for(&metadata.deposit_id),
            )),
        }
    }
}
