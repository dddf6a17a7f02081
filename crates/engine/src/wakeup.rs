// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wake-up dispatch
//!
//! A wake-up names a submission or a deposit. A dirty deposit gets a
//! deposit task; a submitted one gets a status check; a final one is left
//! alone. Handling the same wake-up twice is safe.

use crate::pool::Dispatch;
use crate::reconcile::{Batch, RunSummary};
use crate::services::DepositServices;
use crate::status::DepositStatusProcessor;
use crate::submission::SubmissionProcessor;
use crate::task::DepositTask;
use ds_adapters::{ResourceClient, StoreError};
use ds_core::{Deposit, WakeUp};

/// Routes wake-up messages to the matching processor
pub struct WakeUpHandler<C> {
    services: DepositServices<C>,
    dispatch: Dispatch,
}

impl<C: ResourceClient> WakeUpHandler<C> {
    pub fn new(services: DepositServices<C>, dispatch: Dispatch) -> Self {
        Self { services, dispatch }
    }

    pub async fn handle(&self, wake: &WakeUp) -> Result<RunSummary, StoreError> {
        tracing::info!(%wake, "wake-up");
        match wake {
            WakeUp::Submission(id) => Ok(SubmissionProcessor::new(
                self.services.clone(),
                self.dispatch.clone(),
            )
            .process(id)
            .await),
            WakeUp::Deposit(id) => self.handle_deposit(id).await,
        }
    }

    async fn handle_deposit(&self, deposit_id: &str) -> Result<RunSummary, StoreError> {
        let deposit: Deposit = self.services.store.get(deposit_id).await?;
        let candidate = RunSummary {
            candidates: 1,
            ..RunSummary::default()
        };
        let services = self.services.clone();
        let id = deposit.id.clone();

        if deposit.is_dirty() {
            let mut batch = Batch::new(candidate);
            batch
                .dispatch(&self.dispatch, deposit_id, async move {
                    DepositTask::execute(services, &id).await
                })
                .await;
            Ok(batch.settle(|outcome| outcome.is_failure()).await)
        } else if deposit.is_awaiting_confirmation() {
            let mut batch = Batch::new(candidate);
            batch
                .dispatch(&self.dispatch, deposit_id, async move {
                    DepositStatusProcessor::new(services).process(&id).await
                })
                .await;
            Ok(batch.settle(|outcome| outcome.is_failure()).await)
        } else {
            tracing::info!(deposit_id, status = deposit.status_label(), "deposit is final");
            Ok(RunSummary {
                skipped: 1,
                ..RunSummary::default()
            })
        }
    }
}

#[cfg(test)]
#[path = "wakeup_tests.rs"]
mod tests;
