// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target repositories

use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// An external archive that deposits are sent to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub name: String,
    /// Name of the packager configured for this repository
    pub repository_key: String,
}

impl Resource for Repository {
    const KIND: &'static str = "repository";

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
