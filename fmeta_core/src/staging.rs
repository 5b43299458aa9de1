//! Path-addressed staging records.
//!
//! A staging record captures what was last observed at one absolute path:
//! the content hash plus the file identity attributes used for display.
//! Records are stored one file per tracked path, with the tracked path
//! re-rooted under the repository's `staging/` subtree.

use crate::error::{Error, Result};
use crate::hash::ContentHash;
use crate::persist;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Last-known content identity recorded for a specific filesystem path.
///
/// Replaced wholesale whenever the path's content changes; never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingRecord {
    /// Content hash last observed at this path.
    pub hash: ContentHash,
    /// Device the file resided on.
    pub device: u64,
    /// File size in bytes.
    pub size: u64,
    /// Modification time, Unix seconds.
    pub modified: i64,
    /// Status-change time, Unix seconds.
    pub changed: i64,
}

impl StagingRecord {
    /// Build a record from a content hash and the file's current metadata.
    pub fn from_metadata(hash: ContentHash, metadata: &fs::Metadata) -> Self {
        let (device, modified, changed) = identity_attrs(metadata);
        Self {
            hash,
            device,
            size: metadata.len(),
            modified,
            changed,
        }
    }
}

#[cfg(unix)]
fn identity_attrs(metadata: &fs::Metadata) -> (u64, i64, i64) {
    use std::os::unix::fs::MetadataExt;
    (metadata.dev(), metadata.mtime(), metadata.ctime())
}

#[cfg(not(unix))]
fn identity_attrs(_metadata: &fs::Metadata) -> (u64, i64, i64) {
    // Device and ctime are POSIX notions; identity degrades to hash+size.
    (0, 0, 0)
}

/// Store of staging records, keyed by absolute file path.
#[derive(Debug, Clone)]
pub struct StagingStore {
    root: PathBuf,
}

impl StagingStore {
    /// Create a store rooted at the repository root.
    ///
    /// Records live under `<root>/staging/`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().join("staging"),
        }
    }

    /// Get the record file location for a tracked path.
    ///
    /// The tracked path must be absolute and free of `.`/`..`
    /// components; its components are re-rooted beneath the staging
    /// subtree. Rejecting dot components keeps every record inside the
    /// subtree.
    pub fn record_path(&self, path: &Path) -> Result<PathBuf> {
        if !path.is_absolute() {
            return Err(Error::precondition(format!(
                "Staging paths must be absolute, got: {}",
                path.display()
            )));
        }

        let mut record_path = self.root.clone();
        for component in path.components() {
            match component {
                Component::RootDir | Component::Prefix(_) => {}
                Component::CurDir | Component::ParentDir => {
                    return Err(Error::precondition(format!(
                        "Staging paths must not contain . or .. components: {}",
                        path.display()
                    )));
                }
                Component::Normal(name) => record_path.push(name),
            }
        }
        Ok(record_path)
    }

    /// Check whether a staging record exists for the given path.
    pub fn exists(&self, path: &Path) -> bool {
        self.record_path(path).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Load the staging record for the given path.
    pub fn get(&self, path: &Path) -> Result<StagingRecord> {
        let record_path = self.record_path(path)?;
        if !record_path.is_file() {
            return Err(Error::staging_not_found(path));
        }
        persist::read_json(&record_path)
    }

    /// Write the staging record for the given path.
    ///
    /// Fully replaces any prior record; creates parent directories as
    /// needed.
    pub fn put(&self, path: &Path, record: &StagingRecord) -> Result<()> {
        let record_path = self.record_path(path)?;
        persist::write_json_atomic(&record_path, record)
    }
}
