// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem drop-box transport
//!
//! Deposits land in `<collection>/<deposit id>/`: the package bytes under the
//! package name, next to a statement document describing the deposit's
//! processing state. Whatever consumes the drop box rewrites the statement
//! as it works through the deposit; the receipt's status reference points
//! at it.
//!
//! Connection extras:
//! - `statement_format`: `json` (default) or `atom`
//! - `initial_state`: state written into a fresh statement (default `in-progress`)

use super::{DepositMetadata, Receipt, Transport, TransportError, TransportSession};
use crate::assemble::{compute_checksums, PackageStream};
use async_trait::async_trait;
use ds_core::{AuthMode, ConnectionHints};
use std::path::{Path, PathBuf};

/// State scheme used by SWORD statements
pub const SWORD_STATE_SCHEME: &str = "http://purl.org/net/sword/terms/state";

const DEFAULT_INITIAL_STATE: &str = "in-progress";

/// Encoding of the statement document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Json,
    Atom,
}

impl StatementFormat {
    fn parse(value: Option<&str>) -> Result<Self, TransportError> {
        match value.map(str::to_ascii_lowercase).as_deref() {
            None | Some("json") => Ok(StatementFormat::Json),
            Some("atom") => Ok(StatementFormat::Atom),
            Some(other) => Err(TransportError::Open(format!(
                "unknown statement_format '{}'",
                other
            ))),
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            StatementFormat::Json => "statement.json",
            StatementFormat::Atom => "statement.atom",
        }
    }
}

/// Transport writing into a local directory
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemTransport;

impl FilesystemTransport {
    pub fn new() -> Self {
        Self
    }
}

struct FilesystemSession {
    collection: PathBuf,
    format: StatementFormat,
    initial_state: String,
}

#[async_trait]
impl Transport for FilesystemTransport {
    async fn open(
        &self,
        hints: &ConnectionHints,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        let collection = hints
            .collection
            .as_deref()
            .map(|c| c.strip_prefix("file://").unwrap_or(c))
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| TransportError::Open("no collection configured".to_string()))?;

        if hints.auth == AuthMode::Basic && (hints.username.is_none() || hints.password.is_none())
        {
            return Err(TransportError::Auth(
                "basic auth requires a username and password".to_string(),
            ));
        }

        let format =
            StatementFormat::parse(hints.extra.get("statement_format").map(String::as_str))?;
        let initial_state = hints
            .extra
            .get("initial_state")
            .cloned()
            .unwrap_or_else(|| DEFAULT_INITIAL_STATE.to_string());

        tokio::fs::create_dir_all(collection).await.map_err(|e| {
            TransportError::Open(format!("cannot create collection {}: {}", collection, e))
        })?;

        Ok(Box::new(FilesystemSession {
            collection: PathBuf::from(collection),
            format,
            initial_state,
        }))
    }
}

#[async_trait]
impl TransportSession for FilesystemSession {
    async fn deposit(
        &self,
        package: &PackageStream,
        metadata: &DepositMetadata,
    ) -> Result<Receipt, TransportError> {
        if package.is_empty() {
            return Err(TransportError::Rejected("empty package".to_string()));
        }
        // The drop box verifies what it was told it would receive
        for expected in &package.checksums {
            let actual = compute_checksums(&package.bytes, &[expected.algorithm]);
            if actual.first().map(|c| c.value.as_str()) != Some(expected.value.as_str()) {
                return Err(TransportError::Rejected(format!(
                    "{} checksum mismatch",
                    expected.algorithm.as_str()
                )));
            }
        }
        if !is_plain_name(&metadata.deposit_id) || !is_plain_name(&package.name) {
            return Err(TransportError::Rejected(format!(
                "unsafe name in deposit {}",
                metadata.deposit_id
            )));
        }

        let dir = self.collection.join(&metadata.deposit_id);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&package.name), &package.bytes).await?;

        let statement_path = dir.join(self.format.file_name());
        let statement = match self.format {
            StatementFormat::Json => json_statement(package, metadata, &self.initial_state)?,
            StatementFormat::Atom => atom_statement(package, metadata, &self.initial_state),
        };
        write_atomic(&statement_path, statement.as_bytes()).await?;

        tracing::debug!(
            deposit_id = %metadata.deposit_id,
            path = %statement_path.display(),
            "statement written"
        );

        Ok(Receipt {
            status_ref: Some(statement_path.display().to_string()),
            success: true,
            message: Some(format!("stored {} bytes", package.len())),
        })
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), TransportError> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn json_statement(
    package: &PackageStream,
    metadata: &DepositMetadata,
    state: &str,
) -> Result<String, TransportError> {
    let checksums: serde_json::Map<String, serde_json::Value> = package
        .checksums
        .iter()
        .map(|c| (c.algorithm.as_str().to_string(), c.value.clone().into()))
        .collect();
    let doc = serde_json::json!({
        "deposit": metadata.deposit_id,
        "submission": metadata.submission_id,
        "repository": metadata.repository_id,
        "package": package.name,
        "spec": package.spec,
        "size": package.len(),
        "checksums": checksums,
        "state": state,
        "updated": chrono::Utc::now().to_rfc3339(),
    });
    serde_json::to_string_pretty(&doc)
        .map_err(|e| TransportError::Io(std::io::Error::other(e)))
}

fn atom_statement(package: &PackageStream, metadata: &DepositMetadata, state: &str) -> String {
    let term = if state.contains(':') {
        state.to_string()
    } else {
        format!("http://dspace.org/state/{}", state)
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:ds:deposit:{id}</id>
  <title>Deposit {id}</title>
  <updated>{updated}</updated>
  <category scheme="{scheme}" term="{term}" label="State"/>
  <entry>
    <title>{name}</title>
    <content type="{mime}" src="{name}"/>
  </entry>
</feed>
"#,
        id = escape_xml(&metadata.deposit_id),
        updated = chrono::Utc::now().to_rfc3339(),
        scheme = SWORD_STATE_SCHEME,
        term = escape_xml(&term),
        name = escape_xml(&package.name),
        mime = escape_xml(&package.mime_type),
    )
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "filesystem_tests.rs"]
mod tests;
