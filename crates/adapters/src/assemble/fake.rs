// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake assembler for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{compute_checksums, AssembleError, Assembler, PackageStream};
use async_trait::async_trait;
use ds_core::{DepositSubmission, PackageOptions};
use std::sync::{Arc, Mutex};

/// Recorded assemble call
#[derive(Debug, Clone)]
pub struct AssembleCall {
    pub submission: String,
    pub spec: String,
    pub files: usize,
}

#[derive(Default)]
struct FakeAssemblerState {
    calls: Vec<AssembleCall>,
    fail_with: Option<String>,
}

/// Assembler that packages the submission id and records every call
#[derive(Clone, Default)]
pub struct FakeAssembler {
    inner: Arc<Mutex<FakeAssemblerState>>,
}

impl FakeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following call as if a file were unreachable
    pub fn fail_unreachable(&self, file: &str) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fail_with = Some(file.to_string());
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<AssembleCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

#[async_trait]
impl Assembler for FakeAssembler {
    async fn assemble(
        &self,
        submission: &DepositSubmission,
        options: &PackageOptions,
    ) -> Result<PackageStream, AssembleError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(AssembleCall {
            submission: submission.id.clone(),
            spec: options.spec.clone(),
            files: submission.manifest.len(),
        });

        if let Some(file) = &inner.fail_with {
            return Err(AssembleError::FileUnreachable {
                file: file.clone(),
                location: format!("fake://{}", file),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "injected"),
            });
        }

        let bytes = submission.id.as_bytes().to_vec();
        Ok(PackageStream {
            name: format!("{}.pkg", submission.id),
            spec: options.spec.clone(),
            mime_type: "application/octet-stream".to_string(),
            checksums: compute_checksums(&bytes, &options.checksums),
            bytes,
        })
    }
}
