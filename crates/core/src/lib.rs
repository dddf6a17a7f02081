// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ds-core: data model for deposit services
//!
//! This crate provides:
//! - Deposit, Submission and Repository records and the deposit lifecycle states
//! - The packaging model derived from a submission
//! - Mapping of remote state terms to deposit statuses
//! - Configuration, id generation, lookup caches and wake-up messages

pub mod cache;
pub mod config;
pub mod deposit;
pub mod id;
pub mod repository;
pub mod resource;
pub mod status;
pub mod submission;
pub mod wakeup;

pub use cache::LookupCache;
pub use config::{
    AuthMode, ChecksumAlgorithm, Config, ConfigError, ConnectionHints, PackageOptions,
    PackagerConfig, PoolConfig,
};
pub use deposit::{Deposit, DepositStatus};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use repository::Repository;
pub use resource::{Resource, ResourceKey};
pub use status::ParsedState;
pub use submission::{DepositSubmission, ManifestEntry, ManifestError, Submission, SubmissionFile};
pub use wakeup::{WakeUp, WakeUpError};
