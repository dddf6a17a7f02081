// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Packager registry
//!
//! Packagers pair an assembler with a transport plus their options. The
//! registry is built once at startup from configuration and an explicit
//! table of component implementations, then shared read-only.

use ds_adapters::{
    Assembler, BundleAssembler, FilesystemTransport, TracedAssembler, TracedTransport, Transport,
};
use ds_core::{ConnectionHints, PackageOptions, PackagerConfig};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no packager named '{0}'")]
    MissingPackager(String),
    #[error("packager '{packager}' uses unknown assembler '{name}'")]
    UnknownAssembler { packager: String, name: String },
    #[error("packager '{packager}' uses unknown transport '{name}'")]
    UnknownTransport { packager: String, name: String },
}

/// Component implementations available to packagers, by name
#[derive(Clone, Default)]
pub struct Components {
    assemblers: HashMap<String, Arc<dyn Assembler>>,
    transports: HashMap<String, Arc<dyn Transport>>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// The implementations shipped with this crate, traced
    pub fn builtin() -> Self {
        Self::new()
            .with_assembler("bundle", TracedAssembler::new(BundleAssembler::new()))
            .with_transport("filesystem", TracedTransport::new(FilesystemTransport::new()))
    }

    pub fn with_assembler(mut self, name: &str, assembler: impl Assembler + 'static) -> Self {
        self.assemblers.insert(name.to_string(), Arc::new(assembler));
        self
    }

    pub fn with_transport(mut self, name: &str, transport: impl Transport + 'static) -> Self {
        self.transports.insert(name.to_string(), Arc::new(transport));
        self
    }
}

/// A configured assembler/transport pair
pub struct Packager {
    pub name: String,
    pub assembler: Arc<dyn Assembler>,
    pub transport: Arc<dyn Transport>,
    pub options: PackageOptions,
    pub hints: ConnectionHints,
}

impl std::fmt::Debug for Packager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packager")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("hints", &self.hints)
            .finish_non_exhaustive()
    }
}

/// Packagers by name
#[derive(Debug, Clone, Default)]
pub struct PackagerRegistry {
    packagers: HashMap<String, Arc<Packager>>,
}

impl PackagerRegistry {
    /// Build every configured packager. Unknown component names fail here
    /// rather than on first use.
    pub fn from_config(
        config: &BTreeMap<String, PackagerConfig>,
        components: &Components,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for (name, packager) in config {
            let assembler = components
                .assemblers
                .get(&packager.assembler)
                .cloned()
                .ok_or_else(|| RegistryError::UnknownAssembler {
                    packager: name.clone(),
                    name: packager.assembler.clone(),
                })?;
            let transport = components
                .transports
                .get(&packager.transport)
                .cloned()
                .ok_or_else(|| RegistryError::UnknownTransport {
                    packager: name.clone(),
                    name: packager.transport.clone(),
                })?;
            registry.insert(Packager {
                name: name.clone(),
                assembler,
                transport,
                options: packager.package.clone(),
                hints: packager.connection.clone(),
            });
        }
        tracing::debug!(packagers = registry.packagers.len(), "packager registry built");
        Ok(registry)
    }

    pub fn insert(&mut self, packager: Packager) {
        self.packagers.insert(packager.name.clone(), Arc::new(packager));
    }

    pub fn get(&self, name: &str) -> Result<Arc<Packager>, RegistryError> {
        self.packagers
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::MissingPackager(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packagers.contains_key(name)
    }

    /// Configured packager names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.packagers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
