// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loading and validating everything one deposit attempt needs

use crate::registry::{Packager, RegistryError};
use crate::services::DepositServices;
use ds_adapters::{ResourceClient, StoreError};
use ds_core::{Deposit, DepositSubmission, ManifestError, Repository, Submission};
use std::sync::Arc;
use thiserror::Error;

/// Why a deposit cannot be attempted
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("repository {repository}: {source}")]
    MissingPackager {
        repository: String,
        #[source]
        source: RegistryError,
    },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PrepareError {
    /// Validation failures, as opposed to store failures
    pub fn is_invalid(&self) -> bool {
        !matches!(self, PrepareError::Store(_))
    }
}

/// A deposit together with its packaging model and packager
#[derive(Debug, Clone)]
pub struct DepositWork {
    pub deposit: Deposit,
    pub submission: Submission,
    pub repository: Repository,
    pub packager: Arc<Packager>,
    pub model: DepositSubmission,
}

impl DepositWork {
    /// Load the deposit and re-derive what submitting it needs: the
    /// repository's packager must exist and every file must be located.
    pub async fn prepare<C: ResourceClient>(
        services: &DepositServices<C>,
        deposit_id: &str,
    ) -> Result<Self, PrepareError> {
        let deposit: Deposit = services.store.get(deposit_id).await?;
        let submission: Submission = services.store.get(&deposit.submission).await?;
        let repository = services.repository(&deposit.repository).await?;

        let packager = services
            .registry
            .get(&repository.repository_key)
            .map_err(|source| {
                // Reload the record next time in case it has been fixed
                services.repositories.invalidate(&repository.id);
                PrepareError::MissingPackager {
                    repository: repository.id.clone(),
                    source,
                }
            })?;
        let model = DepositSubmission::derive(&submission)?;

        Ok(Self {
            deposit,
            submission,
            repository,
            packager,
            model,
        })
    }
}
