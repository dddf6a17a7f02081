// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests

use crate::handler::RecordingErrorHandler;
use crate::pool::Dispatch;
use crate::registry::{Packager, PackagerRegistry};
use crate::services::DepositServices;
use ds_adapters::{FakeAssembler, FakeResourceClient, FakeStatusResolver, FakeTransport};
use ds_core::{
    ConnectionHints, Deposit, DepositStatus, PackageOptions, Repository, SequentialIdGen,
    Submission, SubmissionFile,
};
use std::sync::Arc;

pub(crate) const PACKAGER: &str = "archive";
pub(crate) const REPOSITORY: &str = "repo-1";
pub(crate) const SUBMISSION: &str = "sub-1";

/// Fakes wired into a [`DepositServices`], with one repository using the
/// `archive` packager and one submitted submission targeting it
pub(crate) struct Harness {
    pub store: FakeResourceClient,
    pub assembler: FakeAssembler,
    pub transport: FakeTransport,
    pub resolver: FakeStatusResolver,
    pub errors: RecordingErrorHandler,
    pub services: DepositServices<FakeResourceClient>,
}

impl Harness {
    pub fn new() -> Self {
        let store = FakeResourceClient::new();
        let assembler = FakeAssembler::new();
        let transport = FakeTransport::new();
        let resolver = FakeStatusResolver::new();
        let errors = RecordingErrorHandler::new();

        let mut registry = PackagerRegistry::default();
        registry.insert(Packager {
            name: PACKAGER.to_string(),
            assembler: Arc::new(assembler.clone()),
            transport: Arc::new(transport.clone()),
            options: PackageOptions::default(),
            hints: ConnectionHints::default(),
        });

        let services = DepositServices::new(
            store.clone(),
            registry,
            Arc::new(resolver.clone()),
            Arc::new(errors.clone()),
        )
        .with_id_gen(SequentialIdGen::default());

        let harness = Self {
            store,
            assembler,
            transport,
            resolver,
            errors,
            services,
        };
        harness.repository(REPOSITORY, PACKAGER);
        harness.submission(SUBMISSION, &[REPOSITORY]);
        harness
    }

    pub fn repository(&self, id: &str, packager: &str) {
        self.store.put(&Repository {
            id: id.to_string(),
            version: 0,
            name: format!("Repository {}", id),
            repository_key: packager.to_string(),
        });
    }

    /// Store a submitted submission with one located file
    pub fn submission(&self, id: &str, repositories: &[&str]) -> Submission {
        let submission = Submission {
            id: id.to_string(),
            version: 0,
            submitted: true,
            metadata: [("title".to_string(), "Test article".to_string())].into(),
            files: vec![SubmissionFile {
                name: "article.pdf".to_string(),
                location: Some("file:///data/article.pdf".to_string()),
                mime_type: Some("application/pdf".to_string()),
            }],
            repositories: repositories.iter().map(|r| r.to_string()).collect(),
            aggregated_deposit_status: None,
        };
        self.store.put(&submission);
        submission
    }

    /// Store a deposit of the default submission to the default repository
    pub fn deposit(&self, id: &str, status: Option<DepositStatus>) -> Deposit {
        self.deposit_to(id, REPOSITORY, status)
    }

    pub fn deposit_to(&self, id: &str, repository: &str, status: Option<DepositStatus>) -> Deposit {
        let mut deposit = Deposit::new(id, SUBMISSION, repository);
        deposit.status = status;
        if status.is_some_and(|s| s != DepositStatus::Failed) {
            deposit.status_ref = Some(FakeTransport::status_ref_for(id));
        }
        self.store.put(&deposit);
        deposit
    }

    pub fn stored(&self, id: &str) -> Deposit {
        self.store
            .snapshot::<Deposit>(id)
            .unwrap_or_else(|| panic!("deposit {} not stored", id))
    }

    pub fn inline(&self) -> Dispatch {
        Dispatch::Inline(Arc::new(self.errors.clone()))
    }
}
