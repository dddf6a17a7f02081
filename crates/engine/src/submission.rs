// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission wake-ups
//!
//! A submitted submission gets one deposit per target repository. Deposits
//! are created under a critical section on the submission (which itself is
//! never written), so two wake-ups for the same submission in this process
//! cannot both create them. Every dirty deposit of the submission is then
//! handed to a deposit task.

use crate::critical::{BoxError, Outcome};
use crate::handler::FailureKind;
use crate::pool::Dispatch;
use crate::reconcile::{Batch, RunSummary};
use crate::services::DepositServices;
use crate::task::DepositTask;
use ds_adapters::ResourceClient;
use ds_core::{Deposit, Submission};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::Instrument;

/// Turns submissions into deposits and dispatches them
pub struct SubmissionProcessor<C> {
    services: DepositServices<C>,
    dispatch: Dispatch,
}

impl<C: ResourceClient> SubmissionProcessor<C> {
    pub fn new(services: DepositServices<C>, dispatch: Dispatch) -> Self {
        Self { services, dispatch }
    }

    pub async fn process(&self, submission_id: &str) -> RunSummary {
        let span = tracing::info_span!("submission", submission_id);
        self.process_inner(submission_id).instrument(span).await
    }

    async fn process_inner(&self, submission_id: &str) -> RunSummary {
        let store = self.services.store.clone();
        let ids = Arc::clone(&self.services.ids);

        let result = self
            .services
            .critical
            .perform_critical(
                submission_id,
                |s: &Submission| s.submitted,
                |_: &Submission, created: Option<&Vec<String>>| created.is_some(),
                move |submission: Submission| async move {
                    let existing = store
                        .select::<Deposit>(&|d| d.submission == submission.id)
                        .await?;
                    let mut covered: HashSet<String> =
                        existing.into_iter().map(|d| d.repository).collect();

                    let mut created = Vec::new();
                    for repository in &submission.repositories {
                        if !covered.insert(repository.clone()) {
                            continue;
                        }
                        let deposit = Deposit::new(ids.next(), &submission.id, repository);
                        store.create(&deposit).await?;
                        created.push(deposit.id);
                    }
                    Ok::<_, BoxError>((submission, created))
                },
                false,
            )
            .await;

        match result.outcome() {
            Outcome::Applied => {}
            Outcome::NotApplicable => {
                tracing::info!("submission not submitted, nothing to do");
                return RunSummary::default();
            }
            Outcome::Failed => {
                let message = result
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "critical section failed".to_string());
                self.services.report(submission_id, FailureKind::Store, message);
                return RunSummary {
                    failed: 1,
                    ..RunSummary::default()
                };
            }
        }
        if let Some(created) = &result.result {
            tracing::info!(created = created.len(), "deposits created");
        }

        let dirty = match self
            .services
            .store
            .select::<Deposit>(&|d| d.submission == submission_id && d.is_dirty())
            .await
        {
            Ok(dirty) => dirty,
            Err(e) => {
                self.services.report(submission_id, FailureKind::Store, e.to_string());
                return RunSummary {
                    failed: 1,
                    ..RunSummary::default()
                };
            }
        };

        let mut batch = Batch::new(RunSummary {
            candidates: dirty.len(),
            ..RunSummary::default()
        });
        for deposit in dirty {
            let services = self.services.clone();
            let id = deposit.id.clone();
            batch
                .dispatch(&self.dispatch, &deposit.id, async move {
                    DepositTask::execute(services, &id).await
                })
                .await;
        }
        batch.settle(|outcome| outcome.is_failure()).await
    }
}

#[cfg(test)]
#[path = "submission_tests.rs"]
mod tests;
