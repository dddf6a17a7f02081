// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deposit status processing
//!
//! The status document is fetched outside any lock. Only a terminal state
//! leads to a write, through a critical section that requires the deposit
//! to still be SUBMITTED under the same status reference. A non-terminal
//! state leaves the deposit untouched.

use crate::critical::{resource_only, BoxError, Outcome};
use crate::handler::FailureKind;
use crate::services::DepositServices;
use ds_adapters::ResourceClient;
use ds_core::{Deposit, DepositStatus};
use tracing::Instrument;

/// How a status check ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    /// A terminal status was recorded
    Updated(DepositStatus),
    /// The target has not decided yet
    Unchanged,
    /// The deposit is not awaiting confirmation
    NotApplicable,
    Error,
}

impl StatusOutcome {
    pub fn is_failure(self) -> bool {
        self == StatusOutcome::Error
    }
}

/// Resolves submitted deposits against their status documents
pub struct DepositStatusProcessor<C> {
    services: DepositServices<C>,
}

impl<C: ResourceClient> DepositStatusProcessor<C> {
    pub fn new(services: DepositServices<C>) -> Self {
        Self { services }
    }

    pub async fn process(&self, deposit_id: &str) -> StatusOutcome {
        let span = tracing::info_span!("deposit_status", deposit_id);
        self.process_inner(deposit_id).instrument(span).await
    }

    async fn process_inner(&self, deposit_id: &str) -> StatusOutcome {
        let deposit: Deposit = match self.services.store.get(deposit_id).await {
            Ok(deposit) => deposit,
            Err(e) => {
                self.services.report(deposit_id, FailureKind::Store, e.to_string());
                return StatusOutcome::Error;
            }
        };

        if !deposit.is_awaiting_confirmation() {
            tracing::debug!(status = deposit.status_label(), "not awaiting confirmation");
            return StatusOutcome::NotApplicable;
        }
        let Some(status_ref) = deposit.status_ref else {
            tracing::warn!("submitted deposit has no status reference");
            return StatusOutcome::NotApplicable;
        };

        let state = match self.services.resolver.resolve(&status_ref).await {
            Ok(state) => state,
            Err(e) => {
                self.services.report(deposit_id, FailureKind::StatusResolution, e.to_string());
                return StatusOutcome::Error;
            }
        };

        let Some(terminal) = state.to_deposit_status() else {
            tracing::debug!(%state, "target has not reached a final state");
            return StatusOutcome::Unchanged;
        };

        let result = self
            .services
            .critical
            .perform_critical(
                deposit_id,
                move |d: &Deposit| {
                    d.status == Some(DepositStatus::Submitted)
                        && d.status_ref.as_deref() == Some(status_ref.as_str())
                },
                resource_only(move |d: &Deposit| d.status == Some(terminal)),
                move |mut d: Deposit| async move {
                    d.mark_terminal(terminal);
                    Ok::<_, BoxError>((d, ()))
                },
                true,
            )
            .await;

        match result.outcome() {
            Outcome::Applied => {
                tracing::info!(status = %terminal, %state, "deposit reached final state");
                StatusOutcome::Updated(terminal)
            }
            Outcome::NotApplicable => {
                tracing::info!("deposit changed while resolving, leaving it");
                StatusOutcome::NotApplicable
            }
            Outcome::Failed => {
                let message = result
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "critical section failed".to_string());
                self.services.report(deposit_id, FailureKind::Store, message);
                StatusOutcome::Error
            }
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
