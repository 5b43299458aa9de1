//! The tracking state machine.
//!
//! A `FileTracker` reconciles a single path against the staging and
//! object stores, and is the only component that mutates them in
//! combination.

use crate::error::{Error, Result};
use crate::hash::ContentHash;
use crate::object::{Comment, ObjectRecord, ObjectStore};
use crate::staging::{StagingRecord, StagingStore};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Classification of a path against the repository's records.
///
/// The four outcomes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    /// Content never seen, path never seen.
    New,
    /// Path is staged and its content is unchanged.
    Same,
    /// Path is staged but its content no longer matches.
    Dirty,
    /// Content is already known, but under a different path.
    NewName,
}

impl FileState {
    /// One-letter status code used for terse display.
    pub fn code(&self) -> char {
        match self {
            FileState::New => '?',
            FileState::Same => 'S',
            FileState::Dirty => 'M',
            FileState::NewName => '+',
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileState::New => "new",
            FileState::Same => "same",
            FileState::Dirty => "dirty",
            FileState::NewName => "new-name",
        };
        write!(f, "{}", name)
    }
}

/// Tracks one file against the staging and object stores.
///
/// The content hash is computed once, at construction. A long-lived
/// tracker observing a path that changes underneath it acts on stale
/// hash information until re-constructed.
#[derive(Debug)]
pub struct FileTracker {
    path: PathBuf,
    hash: ContentHash,
    size: u64,
    staging: StagingStore,
    objects: ObjectStore,
}

impl FileTracker {
    /// Bind a tracker to an absolute file path, hashing it eagerly.
    pub(crate) fn new(staging: StagingStore, objects: ObjectStore, path: PathBuf) -> Result<Self> {
        let metadata = fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(Error::not_a_file(&path));
        }

        let hash = ContentHash::hash_file(&path)?;
        debug!(path = %path.display(), hash = %hash, "bound tracker");

        Ok(Self {
            path,
            hash,
            size: metadata.len(),
            staging,
            objects,
        })
    }

    /// The tracked absolute path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The content hash computed at construction.
    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    /// The file size observed at construction.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Classify the tracked path.
    ///
    /// Evaluated fresh on every call; nothing is cached across calls.
    /// Staging presence is checked before object presence: a path with a
    /// stale staging record must classify by content match (dirty), not
    /// as a brand-new path.
    pub fn state(&self) -> Result<FileState> {
        let state = if self.staging.exists(&self.path) {
            let record = self.staging.get(&self.path)?;
            if record.hash == self.hash {
                FileState::Same
            } else {
                FileState::Dirty
            }
        } else if self.objects.exists(&self.hash) {
            FileState::NewName
        } else {
            FileState::New
        };

        debug!(path = %self.path.display(), state = %state, "classified");
        Ok(state)
    }

    /// Start tracking a brand-new file.
    ///
    /// Precondition: neither a staging record for the path nor an object
    /// record for its current hash exists. Creates both.
    pub fn create_infos(&self) -> Result<()> {
        if self.staging.exists(&self.path) {
            return Err(Error::precondition(format!(
                "Path is already staged: {}",
                self.path.display()
            )));
        }
        if self.objects.exists(&self.hash) {
            return Err(Error::precondition(format!(
                "Object record already exists for hash: {}",
                self.hash
            )));
        }

        self.objects
            .create(self.hash, self.size, &self.path, now())?;
        self.write_staging_record()?;

        info!(path = %self.path.display(), hash = %self.hash, "tracking new file");
        Ok(())
    }

    /// Stage a new path for already-known content.
    ///
    /// Used when the state is new-name: writes the staging record for
    /// this path and appends the path to the existing object record's
    /// history. Does not create a new object record.
    pub fn add_staging_info(&self) -> Result<()> {
        let mut record = self.objects.get(&self.hash)?;
        record.record_path(&self.path, now());
        self.objects.put(&self.hash, &record)?;

        self.write_staging_record()?;

        info!(path = %self.path.display(), hash = %self.hash, "staged new name for known content");
        Ok(())
    }

    /// Re-record a path whose content changed.
    ///
    /// Precondition: the current hash differs from the staging record's
    /// hash. Overwrites the staging record and associates the path with
    /// the object record for the new hash, creating it when absent.
    pub fn replace_infos(&self) -> Result<()> {
        if !self.staging.exists(&self.path) {
            return Err(Error::precondition(format!(
                "Path is not staged: {}",
                self.path.display()
            )));
        }

        let staged = self.staging.get(&self.path)?;
        if staged.hash == self.hash {
            return Err(Error::precondition(format!(
                "Content at {} is unchanged",
                self.path.display()
            )));
        }

        self.write_staging_record()?;

        if self.objects.exists(&self.hash) {
            let mut record = self.objects.get(&self.hash)?;
            record.record_path(&self.path, now());
            self.objects.put(&self.hash, &record)?;
        } else {
            self.objects
                .create(self.hash, self.size, &self.path, now())?;
        }

        info!(path = %self.path.display(), hash = %self.hash, "replaced staging info");
        Ok(())
    }

    /// Append a comment to the object record for this path's content.
    ///
    /// Returns the created comment. Fails if no object record exists.
    pub fn add_comment(&self, text: &str) -> Result<Comment> {
        let mut record = self.objects.get(&self.hash)?;
        let comment = record.add_comment(text, now());
        self.objects.put(&self.hash, &record)?;

        info!(hash = %self.hash, id = %comment.id, "added comment");
        Ok(comment)
    }

    /// Set a key/value annotation on the object record. Last write wins.
    pub fn add_meta(&self, key: &str, value: &str) -> Result<()> {
        let mut record = self.objects.get(&self.hash)?;
        record.set_meta(key, value);
        self.objects.put(&self.hash, &record)?;

        info!(hash = %self.hash, key, "set meta");
        Ok(())
    }

    /// Add a tag to the object record. Idempotent.
    pub fn add_tag(&self, tag: &str) -> Result<()> {
        let mut record = self.objects.get(&self.hash)?;
        record.add_tag(tag);
        self.objects.put(&self.hash, &record)?;

        info!(hash = %self.hash, tag, "added tag");
        Ok(())
    }

    /// Load the object record for this path's content.
    pub fn object_record(&self) -> Result<ObjectRecord> {
        self.objects.get(&self.hash)
    }

    /// Load the staging record for this path.
    pub fn staging_record(&self) -> Result<StagingRecord> {
        self.staging.get(&self.path)
    }

    /// Write a staging record reflecting the file's current identity.
    fn write_staging_record(&self) -> Result<()> {
        let metadata = fs::metadata(&self.path)?;
        let record = StagingRecord::from_metadata(self.hash, &metadata);
        self.staging.put(&self.path, &record)
    }
}

/// Current time as Unix seconds.
fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
