// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::assemble::{AssembleError, Assembler, PackageStream};
use crate::status::{ResolveError, StatusResolver};
use crate::transport::{DepositMetadata, Receipt, Transport, TransportError, TransportSession};
use async_trait::async_trait;
use ds_core::{ConnectionHints, DepositSubmission, PackageOptions, ParsedState};
use tracing::Instrument;

/// Wrapper that adds tracing to any Assembler
#[derive(Clone)]
pub struct TracedAssembler<A> {
    inner: A,
}

impl<A> TracedAssembler<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: Assembler> Assembler for TracedAssembler<A> {
    async fn assemble(
        &self,
        submission: &DepositSubmission,
        options: &PackageOptions,
    ) -> Result<PackageStream, AssembleError> {
        let span = tracing::info_span!(
            "assembler.assemble",
            submission = %submission.id,
            spec = %options.spec
        );

        async {
            tracing::info!(files = submission.manifest.len(), "starting");

            // Precondition: there must be something to package
            if submission.manifest.is_empty() {
                tracing::error!("empty manifest");
                return Err(AssembleError::Encoding(format!(
                    "submission {} has an empty manifest",
                    submission.id
                )));
            }

            let start = std::time::Instant::now();
            let result = self.inner.assemble(submission, options).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(package) => tracing::info!(
                    package = %package.name,
                    bytes = package.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "package assembled"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "assembly failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any Transport and the sessions it opens
#[derive(Clone)]
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for TracedTransport<T> {
    async fn open(
        &self,
        hints: &ConnectionHints,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        let collection = hints.collection.as_deref().unwrap_or("");
        let span = tracing::info_span!("transport.open", collection, auth = ?hints.auth);

        match self.inner.open(hints).instrument(span.clone()).await {
            Ok(session) => {
                span.in_scope(|| tracing::debug!("session opened"));
                Ok(Box::new(TracedSession {
                    inner: session,
                    collection: collection.to_string(),
                }))
            }
            Err(e) => {
                span.in_scope(|| tracing::error!(error = %e, "open failed"));
                Err(e)
            }
        }
    }
}

struct TracedSession {
    inner: Box<dyn TransportSession>,
    collection: String,
}

#[async_trait]
impl TransportSession for TracedSession {
    async fn deposit(
        &self,
        package: &PackageStream,
        metadata: &DepositMetadata,
    ) -> Result<Receipt, TransportError> {
        let span = tracing::info_span!(
            "transport.deposit",
            deposit_id = %metadata.deposit_id,
            collection = %self.collection
        );

        async {
            tracing::info!(package = %package.name, bytes = package.len(), "sending");

            let start = std::time::Instant::now();
            let result = self.inner.deposit(package, metadata).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(receipt) => tracing::info!(
                    status_ref = receipt.status_ref.as_deref().unwrap_or("-"),
                    success = receipt.success,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "deposited"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "deposit failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any StatusResolver
#[derive(Clone)]
pub struct TracedStatusResolver<R> {
    inner: R,
}

impl<R> TracedStatusResolver<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: StatusResolver> StatusResolver for TracedStatusResolver<R> {
    async fn resolve(&self, status_ref: &str) -> Result<ParsedState, ResolveError> {
        let span = tracing::info_span!("status.resolve", status_ref);

        async {
            // Precondition: a reference to resolve
            if status_ref.trim().is_empty() {
                tracing::error!("empty status reference");
                return Err(ResolveError::NotFound(status_ref.to_string()));
            }

            let start = std::time::Instant::now();
            let result = self.inner.resolve(status_ref).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(state) => tracing::debug!(
                    %state,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "resolved"
                ),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "resolve failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
