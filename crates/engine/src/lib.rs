// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Deposit services engine
//!
//! Critical sections over stored resources, deposit tasks, status
//! processing, reconciliation runners and the worker pool they run on.

mod critical;
mod handler;
mod pool;
mod reconcile;
mod registry;
mod services;
mod status;
mod submission;
mod task;
mod wakeup;
mod work;

#[cfg(test)]
mod testing;

pub use critical::{
    resource_only, BoxError, CriticalError, CriticalPath, CriticalResult, Outcome,
};
pub use handler::{DepositFailure, ErrorHandler, FailureKind, LoggingErrorHandler};
pub use pool::{Dispatch, PoolError, TaskHandle, WorkerPool};
pub use reconcile::{DirtyDepositRunner, RunSummary, SubmittedDepositRunner};
pub use registry::{Components, Packager, PackagerRegistry, RegistryError};
pub use services::DepositServices;
pub use status::{DepositStatusProcessor, StatusOutcome};
pub use submission::SubmissionProcessor;
pub use task::{DepositTask, TaskOutcome};
pub use wakeup::WakeUpHandler;
pub use work::{DepositWork, PrepareError};

#[cfg(any(test, feature = "test-support"))]
pub use handler::RecordingErrorHandler;
