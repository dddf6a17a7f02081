// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON bundle packages
//!
//! A bundle is a single JSON document carrying the submission metadata and
//! every file inline (base64). It is the package format of the filesystem
//! transport.

use super::{compute_checksums, AssembleError, Assembler, PackageStream};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ds_core::{DepositSubmission, PackageOptions};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Package spec prefix this assembler produces
pub const BUNDLE_SPEC: &str = "ds-bundle";

const BUNDLE_MIME_TYPE: &str = "application/json";

#[derive(Serialize)]
struct Bundle<'a> {
    spec: &'a str,
    submission: &'a str,
    metadata: &'a BTreeMap<String, String>,
    files: Vec<BundleFile<'a>>,
}

#[derive(Serialize)]
struct BundleFile<'a> {
    name: &'a str,
    mime_type: &'a str,
    size: usize,
    sha256: String,
    content: String,
}

/// Assembler for `ds-bundle` packages
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleAssembler;

impl BundleAssembler {
    pub fn new() -> Self {
        Self
    }
}

fn check_options(options: &PackageOptions) -> Result<(), AssembleError> {
    if !options.spec.starts_with(BUNDLE_SPEC) {
        return Err(AssembleError::UnsupportedSpec(options.spec.clone()));
    }
    // Bundles are plain JSON; no container or compression layer
    for (what, value) in [
        ("archive", &options.archive),
        ("compression", &options.compression),
    ] {
        if let Some(value) = value {
            if !value.eq_ignore_ascii_case("none") {
                return Err(AssembleError::UnsupportedSpec(format!(
                    "{} with {}={}",
                    options.spec, what, value
                )));
            }
        }
    }
    Ok(())
}

fn local_path(location: &str) -> &str {
    location.strip_prefix("file://").unwrap_or(location)
}

#[async_trait]
impl Assembler for BundleAssembler {
    async fn assemble(
        &self,
        submission: &DepositSubmission,
        options: &PackageOptions,
    ) -> Result<PackageStream, AssembleError> {
        check_options(options)?;

        let mut files = Vec::with_capacity(submission.manifest.len());
        for entry in &submission.manifest {
            let bytes = tokio::fs::read(local_path(&entry.location))
                .await
                .map_err(|source| AssembleError::FileUnreachable {
                    file: entry.name.clone(),
                    location: entry.location.clone(),
                    source,
                })?;
            files.push(BundleFile {
                name: &entry.name,
                mime_type: entry
                    .mime_type
                    .as_deref()
                    .unwrap_or("application/octet-stream"),
                size: bytes.len(),
                sha256: format!("{:x}", Sha256::digest(&bytes)),
                content: STANDARD.encode(&bytes),
            });
        }

        let bundle = Bundle {
            spec: &options.spec,
            submission: &submission.id,
            metadata: &submission.metadata,
            files,
        };
        let bytes = serde_json::to_vec_pretty(&bundle)
            .map_err(|e| AssembleError::Encoding(e.to_string()))?;
        let checksums = compute_checksums(&bytes, &options.checksums);

        Ok(PackageStream {
            name: format!("{}.bundle.json", submission.id),
            spec: options.spec.clone(),
            mime_type: BUNDLE_MIME_TYPE.to_string(),
            bytes,
            checksums,
        })
    }
}

#[cfg(test)]
#[path = "bundle_tests.rs"]
mod tests;
