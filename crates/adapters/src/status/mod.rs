// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status document resolution
//!
//! A status reference points at a state document published by the target.
//! Resolvers fetch the document; statement parsers read the processing
//! state out of it.

mod atom;
mod filesystem;
mod json;

pub use atom::AtomStatementParser;
pub use filesystem::FilesystemStatusResolver;
pub use json::JsonStatementParser;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStatusResolver;

use async_trait::async_trait;
use ds_core::ParsedState;
use thiserror::Error;

/// Errors from status resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("status document not found: {0}")]
    NotFound(String),
    #[error("io error reading {reference}: {source}")]
    Io {
        reference: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse status document {reference}: {reason}")]
    Unparseable { reference: String, reason: String },
    #[error("fetch failed for {reference}: {reason}")]
    Fetch { reference: String, reason: String },
}

/// Reads the processing state out of one statement encoding
pub trait StatementParser: Send + Sync {
    /// Whether this parser understands the document
    fn accepts(&self, content: &str) -> bool;

    /// Extract the state. Errors carry a reason only; the caller adds the
    /// reference.
    fn parse(&self, content: &str) -> Result<ParsedState, String>;
}

/// Resolves a status reference to the target's current state
#[async_trait]
pub trait StatusResolver: Send + Sync {
    async fn resolve(&self, status_ref: &str) -> Result<ParsedState, ResolveError>;
}
