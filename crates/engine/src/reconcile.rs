// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation runners
//!
//! Batch jobs that recover deposits a previous run left behind:
//! - [`DirtyDepositRunner`] resubmits deposits that were never submitted or
//!   whose last attempt FAILED
//! - [`SubmittedDepositRunner`] re-resolves the status of SUBMITTED deposits
//!
//! Runners walk their candidates in the calling task and hand each unit of
//! work to the dispatcher. One failing deposit never stops the batch.
//! Running either twice is harmless: the critical-section preconditions
//! reject transitions that already happened.

use crate::handler::FailureKind;
use crate::pool::{Dispatch, TaskHandle};
use crate::services::DepositServices;
use crate::status::DepositStatusProcessor;
use crate::task::DepositTask;
use crate::work::DepositWork;
use ds_adapters::{ResourceClient, StoreError};
use ds_core::Deposit;
use std::future::Future;

/// Counts from one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Deposits eligible for the run
    pub candidates: usize,
    /// Units of work handed to the dispatcher
    pub dispatched: usize,
    /// Deposits passed over: ineligible or invalid
    pub skipped: usize,
    /// Dispatch rejections, load failures and failed work
    pub failed: usize,
}

impl RunSummary {
    /// No candidate was found
    pub fn is_empty(&self) -> bool {
        self.candidates == 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl std::ops::AddAssign for RunSummary {
    fn add_assign(&mut self, other: Self) {
        self.candidates += other.candidates;
        self.dispatched += other.dispatched;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "candidates={} dispatched={} skipped={} failed={}",
            self.candidates, self.dispatched, self.skipped, self.failed
        )
    }
}

/// Dispatched work of one run, awaiting completion
pub(crate) struct Batch<O> {
    summary: RunSummary,
    pending: Vec<(String, TaskHandle<O>)>,
}

impl<O: std::fmt::Debug + Send + 'static> Batch<O> {
    pub(crate) fn new(summary: RunSummary) -> Self {
        Self {
            summary,
            pending: Vec::new(),
        }
    }

    pub(crate) fn skip(&mut self) {
        self.summary.skipped += 1;
    }

    pub(crate) fn fail(&mut self) {
        self.summary.failed += 1;
    }

    pub(crate) async fn dispatch<F>(&mut self, dispatch: &Dispatch, deposit_id: &str, work: F)
    where
        F: Future<Output = O> + Send + 'static,
    {
        match dispatch.run(deposit_id, work).await {
            Ok(handle) => {
                self.summary.dispatched += 1;
                self.pending.push((deposit_id.to_string(), handle));
            }
            Err(e) => {
                tracing::warn!(deposit_id, error = %e, "deposit not dispatched");
                self.summary.failed += 1;
            }
        }
    }

    /// Wait for every dispatched unit and count the failures
    pub(crate) async fn settle(self, is_failure: impl Fn(&O) -> bool) -> RunSummary {
        let mut summary = self.summary;
        for (deposit_id, handle) in self.pending {
            match handle.outcome().await {
                Some(outcome) if is_failure(&outcome) => {
                    tracing::warn!(deposit_id = %deposit_id, ?outcome, "deposit failed");
                    summary.failed += 1;
                }
                Some(_) => {}
                None => {
                    tracing::warn!(deposit_id = %deposit_id, "deposit work lost");
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}

/// Find the deposits a run applies to: the explicit ids that are eligible,
/// or every eligible deposit in the store
async fn select_candidates<C: ResourceClient>(
    services: &DepositServices<C>,
    ids: Option<&[String]>,
    eligible: fn(&Deposit) -> bool,
) -> Result<(Vec<String>, RunSummary), StoreError> {
    let mut summary = RunSummary::default();
    let Some(ids) = ids else {
        let deposits = services.store.select::<Deposit>(&|d| eligible(d)).await?;
        summary.candidates = deposits.len();
        return Ok((deposits.into_iter().map(|d| d.id).collect(), summary));
    };

    let mut selected = Vec::new();
    for id in ids {
        match services.store.get::<Deposit>(id).await {
            Ok(deposit) if eligible(&deposit) => selected.push(deposit.id),
            Ok(deposit) => {
                tracing::info!(
                    deposit_id = %id,
                    status = deposit.status_label(),
                    "not eligible, skipping"
                );
                summary.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(deposit_id = %id, error = %e, "cannot load deposit");
                summary.failed += 1;
            }
        }
    }
    summary.candidates = selected.len();
    Ok((selected, summary))
}

/// Resubmits deposits that are unsubmitted or FAILED
pub struct DirtyDepositRunner<C> {
    services: DepositServices<C>,
    dispatch: Dispatch,
}

impl<C: ResourceClient> DirtyDepositRunner<C> {
    pub fn new(services: DepositServices<C>, dispatch: Dispatch) -> Self {
        Self { services, dispatch }
    }

    /// Run over `ids`, or over every dirty deposit when `None`.
    ///
    /// Deposits that fail validation (no packager for the repository, files
    /// without a location) are skipped untouched.
    pub async fn run(&self, ids: Option<&[String]>) -> Result<RunSummary, StoreError> {
        let (candidates, summary) =
            select_candidates(&self.services, ids, Deposit::is_dirty).await?;
        tracing::info!(candidates = candidates.len(), "reconciling dirty deposits");

        let mut batch = Batch::new(summary);
        for deposit_id in candidates {
            match DepositWork::prepare(&self.services, &deposit_id).await {
                Ok(work) => {
                    let task = DepositTask::new(self.services.clone(), work);
                    batch.dispatch(&self.dispatch, &deposit_id, task.run()).await;
                }
                Err(e) if e.is_invalid() => {
                    tracing::info!(
                        deposit_id = %deposit_id,
                        reason = %e,
                        "invalid deposit, skipping"
                    );
                    batch.skip();
                }
                Err(e) => {
                    tracing::warn!(deposit_id = %deposit_id, error = %e, "cannot prepare deposit");
                    self.services.report(&deposit_id, FailureKind::Store, e.to_string());
                    batch.fail();
                }
            }
        }

        Ok(batch.settle(|outcome| outcome.is_failure()).await)
    }
}

/// Re-resolves the status of SUBMITTED deposits
pub struct SubmittedDepositRunner<C> {
    services: DepositServices<C>,
    dispatch: Dispatch,
}

impl<C: ResourceClient> SubmittedDepositRunner<C> {
    pub fn new(services: DepositServices<C>, dispatch: Dispatch) -> Self {
        Self { services, dispatch }
    }

    /// Run over `ids`, or over every SUBMITTED deposit when `None`
    pub async fn run(&self, ids: Option<&[String]>) -> Result<RunSummary, StoreError> {
        let (candidates, summary) =
            select_candidates(&self.services, ids, Deposit::is_awaiting_confirmation).await?;
        tracing::info!(candidates = candidates.len(), "reconciling submitted deposits");

        let mut batch = Batch::new(summary);
        for deposit_id in candidates {
            let processor = DepositStatusProcessor::new(self.services.clone());
            let id = deposit_id.clone();
            batch
                .dispatch(&self.dispatch, &deposit_id, async move {
                    processor.process(&id).await
                })
                .await;
        }

        Ok(batch.settle(|outcome| outcome.is_failure()).await)
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
