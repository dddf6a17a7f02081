// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves status references that are local file paths

use super::{
    AtomStatementParser, JsonStatementParser, ResolveError, StatementParser, StatusResolver,
};
use async_trait::async_trait;
use ds_core::ParsedState;
use std::sync::Arc;

/// Reads statement documents from the filesystem
#[derive(Clone)]
pub struct FilesystemStatusResolver {
    parsers: Vec<Arc<dyn StatementParser>>,
}

impl Default for FilesystemStatusResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesystemStatusResolver {
    /// Resolver understanding JSON and Atom statements
    pub fn new() -> Self {
        Self::with_parsers(vec![
            Arc::new(JsonStatementParser),
            Arc::new(AtomStatementParser),
        ])
    }

    /// Resolver using the given parsers, tried in order
    pub fn with_parsers(parsers: Vec<Arc<dyn StatementParser>>) -> Self {
        Self { parsers }
    }
}

#[async_trait]
impl StatusResolver for FilesystemStatusResolver {
    async fn resolve(&self, status_ref: &str) -> Result<ParsedState, ResolveError> {
        let path = status_ref.strip_prefix("file://").unwrap_or(status_ref);
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResolveError::NotFound(status_ref.to_string()))
            }
            Err(source) => {
                return Err(ResolveError::Io {
                    reference: status_ref.to_string(),
                    source,
                })
            }
        };

        let parser = self
            .parsers
            .iter()
            .find(|p| p.accepts(&content))
            .ok_or_else(|| ResolveError::Unparseable {
                reference: status_ref.to_string(),
                reason: "unrecognized statement format".to_string(),
            })?;

        parser
            .parse(&content)
            .map_err(|reason| ResolveError::Unparseable {
                reference: status_ref.to_string(),
                reason,
            })
    }
}

#[cfg(test)]
#[path = "filesystem_tests.rs"]
mod tests;
