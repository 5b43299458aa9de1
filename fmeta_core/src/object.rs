//! Content-addressed object records.
//!
//! An object record holds everything known about one piece of content,
//! independent of where it currently lives: every path the content has
//! been observed at (with first-seen timestamps), free-text comments,
//! key/value metas, and tags. Records are stored one file per content
//! hash under the repository's `objects/` subtree, sharded by hash
//! prefix.

use crate::error::{Error, Result};
use crate::hash::ContentHash;
use crate::persist;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A free-text comment attached to an object record.
///
/// Immutable once created; comments accumulate and are never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Generated id, unique within one object's comment map.
    pub id: String,
    /// Creation time, Unix seconds.
    pub timestamp: i64,
    /// Comment text.
    pub text: String,
}

/// Metadata recorded for a specific content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Content hash, redundant with the record's storage key. Kept so a
    /// record file is self-describing.
    pub hash: ContentHash,
    /// Content size in bytes.
    pub size: u64,
    /// Absolute paths this content has been seen at, mapped to the Unix
    /// timestamp of first association.
    pub paths: BTreeMap<String, i64>,
    /// Comments keyed by generated id.
    pub comments: BTreeMap<String, Comment>,
    /// Key/value annotations, single value per key.
    pub metas: BTreeMap<String, String>,
    /// Tags, a plain string set.
    pub tags: BTreeSet<String>,
}

impl ObjectRecord {
    /// Create a record seeded with a single path association.
    pub fn new(hash: ContentHash, size: u64, path: &Path, timestamp: i64) -> Self {
        let mut paths = BTreeMap::new();
        paths.insert(path.display().to_string(), timestamp);
        Self {
            hash,
            size,
            paths,
            comments: BTreeMap::new(),
            metas: BTreeMap::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Record a path as associated with this content.
    ///
    /// The first-seen timestamp of an already-known path is preserved.
    pub fn record_path(&mut self, path: &Path, timestamp: i64) {
        self.paths
            .entry(path.display().to_string())
            .or_insert(timestamp);
    }

    /// Append a comment with a freshly generated id.
    ///
    /// Returns the created comment. Ids are random and re-drawn on the
    /// off chance of a collision within this record's map.
    pub fn add_comment(&mut self, text: impl Into<String>, timestamp: i64) -> Comment {
        let mut id = generate_comment_id();
        while self.comments.contains_key(&id) {
            id = generate_comment_id();
        }

        let comment = Comment {
            id: id.clone(),
            timestamp,
            text: text.into(),
        };
        self.comments.insert(id, comment.clone());
        comment
    }

    /// Set a meta value. Last write wins.
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metas.insert(key.into(), value.into());
    }

    /// Add a tag. Idempotent.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        self.tags.insert(tag.into())
    }

    /// Comments ordered by creation time (id breaks ties), for display.
    pub fn comments_by_time(&self) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self.comments.values().collect();
        comments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        comments
    }
}

/// Generate a random 16-character hex comment id.
fn generate_comment_id() -> String {
    let mut bytes = [0u8; 8];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Store of object records, keyed by content hash.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Create a store rooted at the repository root.
    ///
    /// Records live under `<root>/objects/`, sharded by hash prefix.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().join("objects"),
        }
    }

    /// Get the record file location for a content hash.
    pub fn record_path(&self, hash: &ContentHash) -> PathBuf {
        self.root.join(hash.shard_path())
    }

    /// Check whether an object record exists for the given hash.
    pub fn exists(&self, hash: &ContentHash) -> bool {
        self.record_path(hash).is_file()
    }

    /// Load the object record for the given hash.
    pub fn get(&self, hash: &ContentHash) -> Result<ObjectRecord> {
        let record_path = self.record_path(hash);
        if !record_path.is_file() {
            return Err(Error::object_not_found(hash.to_hex()));
        }
        persist::read_json(&record_path)
    }

    /// Write the object record for the given hash.
    ///
    /// Full overwrite; used to persist a loaded record after in-memory
    /// mutation (read-modify-write, no field-level updates).
    pub fn put(&self, hash: &ContentHash, record: &ObjectRecord) -> Result<()> {
        let record_path = self.record_path(hash);
        persist::write_json_atomic(&record_path, record)
    }

    /// Create a fresh object record seeded with one path association.
    ///
    /// Fails if a record for the hash already exists.
    pub fn create(
        &self,
        hash: ContentHash,
        size: u64,
        path: &Path,
        timestamp: i64,
    ) -> Result<ObjectRecord> {
        if self.exists(&hash) {
            return Err(Error::object_exists(hash.to_hex()));
        }

        let record = ObjectRecord::new(hash, size, path, timestamp);
        self.put(&hash, &record)?;
        Ok(record)
    }
}
