// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide error handling for deposit work
//!
//! Failures that leave no safe state transition behind (a missing packager,
//! a task rejected by a saturated pool, a panicking worker) end here, as do
//! the assembly and transport failures behind a FAILED transition.

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Repository names a packager that is not configured
    MissingPackager,
    Assembly,
    Transport,
    /// Resource store read or write failed
    Store,
    StatusResolution,
    /// Worker pool refused the task
    Rejected,
    Panicked,
    /// Records are inconsistent or fail validation
    Invalid,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::MissingPackager => "missing-packager",
            FailureKind::Assembly => "assembly",
            FailureKind::Transport => "transport",
            FailureKind::Store => "store",
            FailureKind::StatusResolution => "status-resolution",
            FailureKind::Rejected => "rejected",
            FailureKind::Panicked => "panicked",
            FailureKind::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure reported for one deposit (or the record that spawned it)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositFailure {
    pub deposit: String,
    pub kind: FailureKind,
    pub message: String,
}

impl DepositFailure {
    pub fn new(deposit: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            deposit: deposit.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Receives every failure that escapes deposit work
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, failure: &DepositFailure);
}

/// Logs failures; reconciliation picks the deposits up later
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingErrorHandler;

impl ErrorHandler for LoggingErrorHandler {
    fn handle(&self, failure: &DepositFailure) {
        match failure.kind {
            FailureKind::Panicked | FailureKind::MissingPackager | FailureKind::Store => {
                tracing::error!(
                    deposit = %failure.deposit,
                    kind = %failure.kind,
                    error = %failure.message,
                    "deposit failure"
                )
            }
            _ => tracing::warn!(
                deposit = %failure.deposit,
                kind = %failure.kind,
                error = %failure.message,
                "deposit failure"
            ),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingErrorHandler;

#[cfg(any(test, feature = "test-support"))]
mod recording {
    #![cfg_attr(coverage_nightly, coverage(off))]

    use super::{DepositFailure, ErrorHandler, FailureKind};
    use std::sync::{Arc, Mutex};

    /// Error handler that keeps every failure for inspection
    #[derive(Clone, Default)]
    pub struct RecordingErrorHandler {
        failures: Arc<Mutex<Vec<DepositFailure>>>,
    }

    impl RecordingErrorHandler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failures(&self) -> Vec<DepositFailure> {
            self.failures
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        pub fn count(&self, kind: FailureKind) -> usize {
            self.failures().iter().filter(|f| f.kind == kind).count()
        }

        pub fn is_empty(&self) -> bool {
            self.failures().is_empty()
        }
    }

    impl ErrorHandler for RecordingErrorHandler {
        fn handle(&self, failure: &DepositFailure) {
            self.failures
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(failure.clone());
        }
    }
}
