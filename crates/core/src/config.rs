// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! [store]
//! root = "store"
//!
//! [pool]
//! workers = 4
//! queue_capacity = 32
//! shutdown_timeout = "30s"
//!
//! [resolution]
//! synchronous = false
//!
//! [packager.archive]
//! assembler = "bundle"
//! transport = "filesystem"
//!
//! [packager.archive.package]
//! spec = "ds-bundle/1.0"
//! checksums = ["sha256"]
//!
//! [packager.archive.connection]
//! auth = "none"
//! collection = "/srv/archive/inbox"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
    /// Packagers by name; repositories refer to these via `repository_key`
    #[serde(default)]
    pub packager: BTreeMap<String, PackagerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
        }
    }
}

fn default_store_root() -> PathBuf {
    PathBuf::from("store")
}

/// Worker pool sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Tasks allowed to wait for a worker before submissions are rejected
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_shutdown_timeout", with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    32
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Resolve the target's status right after a successful submission
    #[serde(default)]
    pub synchronous: bool,
}

/// One packager: which assembler builds the package and which transport
/// carries it, plus their options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagerConfig {
    pub assembler: String,
    pub transport: String,
    #[serde(default)]
    pub package: PackageOptions,
    #[serde(default)]
    pub connection: ConnectionHints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    Sha256,
    Sha512,
}

impl ChecksumAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Sha512 => "sha512",
        }
    }
}

/// Package specification options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOptions {
    #[serde(default = "default_spec")]
    pub spec: String,
    #[serde(default)]
    pub archive: Option<String>,
    #[serde(default)]
    pub compression: Option<String>,
    #[serde(default = "default_checksums")]
    pub checksums: Vec<ChecksumAlgorithm>,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            spec: default_spec(),
            archive: None,
            compression: None,
            checksums: default_checksums(),
        }
    }
}

fn default_spec() -> String {
    "ds-bundle/1.0".to_string()
}

fn default_checksums() -> Vec<ChecksumAlgorithm> {
    vec![ChecksumAlgorithm::Sha256]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    None,
    Basic,
}

/// How to reach the target system
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionHints {
    #[serde(default)]
    pub auth: AuthMode,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Target collection (URL or directory, depending on the transport)
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

// Keep the password out of logs
impl std::fmt::Debug for ConnectionHints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHints")
            .field("auth", &self.auth)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("collection", &self.collection)
            .field("extra", &self.extra)
            .finish()
    }
}

impl Config {
    /// Parse configuration from TOML content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// A relative store root is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;

        if config.store.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.store.root = dir.join(&config.store.root);
            }
        }

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.workers == 0 {
            return Err(ConfigError::Invalid(
                "pool.workers must be at least 1".to_string(),
            ));
        }

        for (name, packager) in &self.packager {
            if packager.assembler.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "packager.{}.assembler must not be empty",
                    name
                )));
            }
            if packager.transport.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "packager.{}.transport must not be empty",
                    name
                )));
            }
            if packager.connection.auth == AuthMode::Basic
                && packager.connection.username.is_none()
            {
                return Err(ConfigError::Invalid(format!(
                    "packager.{}.connection: basic auth requires a username",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
