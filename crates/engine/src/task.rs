// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deposit task: one attempt to transfer a submission to a repository
//!
//! The whole attempt (assemble, open, deposit) runs as the mutate step of
//! a critical section on the deposit, so a resubmission and a status
//! update for the same deposit cannot interleave in this process. Success
//! records SUBMITTED with the receipt's status reference; any failure
//! records FAILED and goes to the error handler. Nothing is retried here;
//! reconciliation picks FAILED deposits up again.

use crate::critical::{BoxError, Outcome};
use crate::handler::FailureKind;
use crate::registry::Packager;
use crate::services::DepositServices;
use crate::status::DepositStatusProcessor;
use crate::work::{DepositWork, PrepareError};
use ds_adapters::{DepositMetadata, ResourceClient};
use ds_core::{Deposit, DepositStatus, DepositSubmission};
use tracing::Instrument;

/// How a deposit task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Submitted { status_ref: String },
    /// Transfer failed; the deposit is recorded FAILED
    Failed(String),
    /// The deposit was not dirty
    NotApplicable,
    /// Nothing could be recorded
    Error(String),
}

impl TaskOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskOutcome::Failed(_) | TaskOutcome::Error(_))
    }
}

/// Why a transfer did not produce a usable receipt
#[derive(Debug, Clone)]
struct TransferFailure {
    kind: FailureKind,
    message: String,
}

impl TransferFailure {
    fn new(kind: FailureKind, message: impl ToString) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

type Attempt = Result<String, TransferFailure>;

/// Assemble the package and hand it to the packager's transport.
/// Returns the status reference of the accepted deposit.
async fn transfer(
    packager: &Packager,
    model: &DepositSubmission,
    metadata: &DepositMetadata,
) -> Attempt {
    let package = packager
        .assembler
        .assemble(model, &packager.options)
        .await
        .map_err(|e| TransferFailure::new(FailureKind::Assembly, e))?;

    let session = packager
        .transport
        .open(&packager.hints)
        .await
        .map_err(|e| TransferFailure::new(FailureKind::Transport, e))?;

    let receipt = session
        .deposit(&package, metadata)
        .await
        .map_err(|e| TransferFailure::new(FailureKind::Transport, e))?;

    if !receipt.success {
        return Err(TransferFailure::new(
            FailureKind::Transport,
            format!(
                "target reported failure: {}",
                receipt.message.as_deref().unwrap_or("no message")
            ),
        ));
    }
    receipt.status_ref.ok_or_else(|| {
        TransferFailure::new(FailureKind::Transport, "receipt has no status reference")
    })
}

/// Submits one deposit
pub struct DepositTask<C> {
    services: DepositServices<C>,
    work: DepositWork,
}

impl<C: ResourceClient> DepositTask<C> {
    pub fn new(services: DepositServices<C>, work: DepositWork) -> Self {
        Self { services, work }
    }

    /// Prepare and run a task for `deposit_id`, reporting preparation
    /// failures to the error handler
    pub async fn execute(services: DepositServices<C>, deposit_id: &str) -> TaskOutcome {
        match DepositWork::prepare(&services, deposit_id).await {
            Ok(work) => Self::new(services, work).run().await,
            Err(e) => {
                let kind = match &e {
                    PrepareError::MissingPackager { .. } => FailureKind::MissingPackager,
                    PrepareError::Manifest(_) => FailureKind::Invalid,
                    PrepareError::Store(_) => FailureKind::Store,
                };
                services.report(deposit_id, kind, e.to_string());
                TaskOutcome::Error(e.to_string())
            }
        }
    }

    pub async fn run(self) -> TaskOutcome {
        let span = tracing::info_span!(
            "deposit_task",
            deposit_id = %self.work.deposit.id,
            repository = %self.work.repository.id,
            packager = %self.work.packager.name
        );
        self.run_attempt().instrument(span).await
    }

    async fn run_attempt(self) -> TaskOutcome {
        let DepositWork {
            deposit,
            submission,
            repository,
            packager,
            model,
        } = self.work;
        let services = self.services;
        let deposit_id = deposit.id;
        let metadata = DepositMetadata {
            deposit_id: deposit_id.clone(),
            submission_id: submission.id,
            repository_id: repository.id,
        };

        let result = services
            .critical
            .perform_critical(
                &deposit_id,
                |d: &Deposit| d.is_dirty(),
                |d: &Deposit, attempt: Option<&Attempt>| match attempt {
                    Some(Ok(_)) => {
                        d.status == Some(DepositStatus::Submitted) && d.status_ref.is_some()
                    }
                    Some(Err(_)) => d.status == Some(DepositStatus::Failed),
                    None => false,
                },
                move |mut deposit: Deposit| async move {
                    let attempt = transfer(&packager, &model, &metadata).await;
                    match &attempt {
                        Ok(status_ref) => deposit.mark_submitted(status_ref.clone()),
                        Err(_) => deposit.mark_failed(),
                    }
                    Ok::<_, BoxError>((deposit, attempt))
                },
                true,
            )
            .await;

        // Failures behind a FAILED transition are reported whether or not
        // the transition itself was recorded
        if let Some(Err(failure)) = &result.result {
            tracing::warn!(kind = %failure.kind, error = %failure.message, "transfer failed");
            services.report(&deposit_id, failure.kind, failure.message.clone());
        }

        match result.outcome() {
            Outcome::Failed => {
                let message = result
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "critical section failed".to_string());
                services.report(&deposit_id, FailureKind::Store, message.clone());
                TaskOutcome::Error(message)
            }
            Outcome::NotApplicable => match result.result {
                None => {
                    tracing::info!(
                        status = result.resource.as_ref().map_or("unknown", Deposit::status_label),
                        "deposit not dirty, skipping"
                    );
                    TaskOutcome::NotApplicable
                }
                Some(_) => {
                    let message = "deposit changed underneath the task".to_string();
                    services.report(&deposit_id, FailureKind::Invalid, message.clone());
                    TaskOutcome::Error(message)
                }
            },
            Outcome::Applied => match result.result {
                Some(Ok(status_ref)) => {
                    tracing::info!(status_ref = %status_ref, "deposit submitted");
                    if services.resolve_synchronously {
                        let status = DepositStatusProcessor::new(services.clone())
                            .process(&deposit_id)
                            .await;
                        tracing::debug!(?status, "synchronous status resolution");
                    }
                    TaskOutcome::Submitted { status_ref }
                }
                Some(Err(failure)) => TaskOutcome::Failed(failure.message),
                None => TaskOutcome::Error("critical section produced no result".to_string()),
            },
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
