// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transports that carry packages to target systems

mod filesystem;

pub use filesystem::{FilesystemTransport, StatementFormat, SWORD_STATE_SCHEME};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransport, TransportCall};

use crate::assemble::PackageStream;
use async_trait::async_trait;
use ds_core::ConnectionHints;
use thiserror::Error;

/// Errors from transports
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot open session: {0}")]
    Open(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("deposit rejected: {0}")]
    Rejected(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("network error: {0}")]
    Network(String),
}

/// Identifies what a package is being deposited for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositMetadata {
    pub deposit_id: String,
    pub submission_id: String,
    pub repository_id: String,
}

/// Target system's acknowledgement of a deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Where the target publishes the deposit's processing state
    pub status_ref: Option<String>,
    pub success: bool,
    pub message: Option<String>,
}

impl Receipt {
    pub fn accepted(status_ref: impl Into<String>) -> Self {
        Self {
            status_ref: Some(status_ref.into()),
            success: true,
            message: None,
        }
    }
}

/// An open connection to a target system
#[async_trait]
pub trait TransportSession: Send + Sync {
    async fn deposit(
        &self,
        package: &PackageStream,
        metadata: &DepositMetadata,
    ) -> Result<Receipt, TransportError>;
}

/// Opens sessions to a kind of target system
#[async_trait]
pub trait Transport: Send + Sync {
    async fn open(&self, hints: &ConnectionHints)
        -> Result<Box<dyn TransportSession>, TransportError>;
}
