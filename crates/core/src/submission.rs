// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submissions and the packaging model derived from them

use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A file attached to a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFile {
    pub name: String,
    /// Where the bytes can be fetched from (`file://` URL or path)
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// The logical unit of content being deposited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub files: Vec<SubmissionFile>,
    /// Target repository ids
    #[serde(default)]
    pub repositories: Vec<String>,
    /// Maintained by a separate aggregation process; never written here
    #[serde(default)]
    pub aggregated_deposit_status: Option<String>,
}

impl Resource for Submission {
    const KIND: &'static str = "submission";

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

/// Reasons a submission cannot be turned into a package manifest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("submission {0} has not been submitted")]
    NotSubmitted(String),
    #[error("submission {0} has no files")]
    NoFiles(String),
    #[error("file '{file}' in submission {submission} has no location")]
    MissingLocation { submission: String, file: String },
}

/// A file that is known to be fetchable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub location: String,
    pub mime_type: Option<String>,
}

/// Everything an assembler needs to build a package for one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositSubmission {
    pub id: String,
    pub metadata: BTreeMap<String, String>,
    pub manifest: Vec<ManifestEntry>,
}

impl DepositSubmission {
    /// Derive the packaging model, validating that every file is located.
    pub fn derive(submission: &Submission) -> Result<Self, ManifestError> {
        if !submission.submitted {
            return Err(ManifestError::NotSubmitted(submission.id.clone()));
        }
        if submission.files.is_empty() {
            return Err(ManifestError::NoFiles(submission.id.clone()));
        }

        let manifest = submission
            .files
            .iter()
            .map(|file| match &file.location {
                Some(location) if !location.trim().is_empty() => Ok(ManifestEntry {
                    name: file.name.clone(),
                    location: location.clone(),
                    mime_type: file.mime_type.clone(),
                }),
                _ => Err(ManifestError::MissingLocation {
                    submission: submission.id.clone(),
                    file: file.name.clone(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: submission.id.clone(),
            metadata: submission.metadata.clone(),
            manifest,
        })
    }
}

#[cfg(test)]
#[path = "submission_tests.rs"]
mod tests;
