// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based resource store
//!
//! Layout: `<root>/<kind>/<id>.json`. Writes go to a temporary file that is
//! renamed into place, so readers never observe a half-written record.
//! Creates and updates hold an exclusive lock on `<root>/.lock`, which
//! makes the version check and the write one step for every client and
//! process sharing the root.

use super::{ResourceClient, StoreError};
use async_trait::async_trait;
use ds_core::Resource;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const LOCK_FILE: &str = ".lock";

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Resource store backed by a directory of JSON files
#[derive(Clone, Debug)]
pub struct FsResourceClient {
    root: PathBuf,
}

/// Held while a write is in progress; the lock is released on drop
struct WriteLock(File);

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

impl FsResourceClient {
    /// Open a store rooted at the given directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lock(&self) -> Result<WriteLock, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.root.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(WriteLock(file))
    }

    fn path_for(&self, kind: &str, id: &str) -> Result<PathBuf, StoreError> {
        if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(kind).join(format!("{}.json", id)))
    }

    fn read<T: Resource>(&self, id: &str) -> Result<T, StoreError> {
        let path = self.path_for(T::KIND, id)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    kind: T::KIND,
                    id: id.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write<T: Resource>(&self, resource: &T) -> Result<(), StoreError> {
        let path = self.path_for(T::KIND, resource.id())?;
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::InvalidId(resource.id().to_string()))?;
        fs::create_dir_all(dir)?;

        // Unique per writer so concurrent writers never share a temp file
        let tmp = dir.join(format!(
            ".{}.{}.{}.tmp",
            resource.id(),
            std::process::id(),
            TMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, serde_json::to_vec_pretty(resource)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[async_trait]
impl ResourceClient for FsResourceClient {
    async fn get<T: Resource>(&self, id: &str) -> Result<T, StoreError> {
        self.read(id)
    }

    async fn create<T: Resource>(&self, resource: &T) -> Result<(), StoreError> {
        let _lock = self.lock()?;

        if self.path_for(T::KIND, resource.id())?.exists() {
            return Err(StoreError::AlreadyExists {
                kind: T::KIND,
                id: resource.id().to_string(),
            });
        }
        self.write(resource)
    }

    async fn update<T: Resource>(&self, resource: &T) -> Result<(), StoreError> {
        let _lock = self.lock()?;

        let current: T = self.read(resource.id())?;
        if current.version() != resource.version() {
            return Err(StoreError::Conflict {
                kind: T::KIND,
                id: resource.id().to_string(),
                expected: resource.version(),
                found: current.version(),
            });
        }

        let mut next = resource.clone();
        next.set_version(resource.version() + 1);
        self.write(&next)
    }

    async fn select<T: Resource>(
        &self,
        filter: &(dyn for<'a> Fn(&'a T) -> bool + Send + Sync),
    ) -> Result<Vec<T>, StoreError> {
        let dir = self.root.join(T::KIND);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut matches = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_record = path.extension().is_some_and(|ext| ext == "json")
                && !path
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            if !is_record {
                continue;
            }
            let resource: T = serde_json::from_slice(&fs::read(&path)?)?;
            if filter(&resource) {
                matches.push(resource);
            }
        }

        matches.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(matches)
    }
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
