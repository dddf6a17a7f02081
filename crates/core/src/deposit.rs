// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deposit record and its lifecycle states
//!
//! A deposit is one attempt to place a submission's content into one
//! target repository. Its status moves through:
//!
//! ```text
//! (unsubmitted) --> SUBMITTED --> ACCEPTED | REJECTED
//!       |               ^
//!       v               |
//!     FAILED -----------+
//! ```
//!
//! `ACCEPTED` and `REJECTED` are final. `FAILED` may be resubmitted in place.

use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// Status of a deposit. An unsubmitted deposit has no status at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    Submitted,
    Failed,
    Accepted,
    Rejected,
}

impl DepositStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, DepositStatus::Accepted | DepositStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DepositStatus::Submitted => "submitted",
            DepositStatus::Failed => "failed",
            DepositStatus::Accepted => "accepted",
            DepositStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attempt to transfer a submission to one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub status: Option<DepositStatus>,
    /// Pointer to the target's state document; only set once submitted
    #[serde(default)]
    pub status_ref: Option<String>,
    pub submission: String,
    pub repository: String,
}

impl Deposit {
    pub fn new(
        id: impl Into<String>,
        submission: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            version: 0,
            status: None,
            status_ref: None,
            submission: submission.into(),
            repository: repository.into(),
        }
    }

    /// Never submitted, or the last attempt failed
    pub fn is_dirty(&self) -> bool {
        matches!(self.status, None | Some(DepositStatus::Failed))
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(DepositStatus::is_terminal)
    }

    /// Submitted and waiting for the target to confirm a final state
    pub fn is_awaiting_confirmation(&self) -> bool {
        self.status == Some(DepositStatus::Submitted)
    }

    /// Record a successful transfer
    pub fn mark_submitted(&mut self, status_ref: impl Into<String>) {
        self.status = Some(DepositStatus::Submitted);
        self.status_ref = Some(status_ref.into());
    }

    /// Record a failed transfer. Any stale status reference is cleared.
    pub fn mark_failed(&mut self) {
        self.status = Some(DepositStatus::Failed);
        self.status_ref = None;
    }

    /// Record a final state reported by the target
    pub fn mark_terminal(&mut self, status: DepositStatus) {
        debug_assert!(status.is_terminal());
        self.status = Some(status);
    }

    /// Status reference is present exactly when the deposit was submitted
    /// (or reached a final state from there)
    pub fn status_ref_consistent(&self) -> bool {
        match self.status {
            None | Some(DepositStatus::Failed) => self.status_ref.is_none(),
            Some(DepositStatus::Submitted) => self.status_ref.is_some(),
            Some(DepositStatus::Accepted) | Some(DepositStatus::Rejected) => true,
        }
    }

    /// Display label for the status, `unsubmitted` when absent
    pub fn status_label(&self) -> &'static str {
        self.status.map_or("unsubmitted", DepositStatus::as_str)
    }
}

impl Resource for Deposit {
    const KIND: &'static str = "deposit";

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

#[cfg(test)]
#[path = "deposit_tests.rs"]
mod tests;
