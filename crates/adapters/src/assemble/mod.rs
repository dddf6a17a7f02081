// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package assemblers

mod bundle;

pub use bundle::BundleAssembler;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{AssembleCall, FakeAssembler};

use async_trait::async_trait;
use ds_core::{ChecksumAlgorithm, DepositSubmission, PackageOptions};
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;

/// Errors from package assembly
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("file '{file}' unreachable at {location}: {source}")]
    FileUnreachable {
        file: String,
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported package spec: {0}")]
    UnsupportedSpec(String),
    #[error("encoding failed: {0}")]
    Encoding(String),
}

/// Checksum of a package, hex encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub algorithm: ChecksumAlgorithm,
    pub value: String,
}

/// An assembled package, ready for a transport
#[derive(Debug, Clone)]
pub struct PackageStream {
    /// File name the package should be stored under
    pub name: String,
    /// Package specification the bytes conform to
    pub spec: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub checksums: Vec<Checksum>,
}

impl PackageStream {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn checksum(&self, algorithm: ChecksumAlgorithm) -> Option<&str> {
        self.checksums
            .iter()
            .find(|c| c.algorithm == algorithm)
            .map(|c| c.value.as_str())
    }
}

/// Compute the requested checksums over `bytes`
pub fn compute_checksums(bytes: &[u8], algorithms: &[ChecksumAlgorithm]) -> Vec<Checksum> {
    algorithms
        .iter()
        .map(|&algorithm| {
            let value = match algorithm {
                ChecksumAlgorithm::Sha256 => format!("{:x}", Sha256::digest(bytes)),
                ChecksumAlgorithm::Sha512 => format!("{:x}", Sha512::digest(bytes)),
            };
            Checksum { algorithm, value }
        })
        .collect()
}

/// Turns a submission's manifest into a package stream
#[async_trait]
pub trait Assembler: Send + Sync {
    async fn assemble(
        &self,
        submission: &DepositSubmission,
        options: &PackageOptions,
    ) -> Result<PackageStream, AssembleError>;
}
