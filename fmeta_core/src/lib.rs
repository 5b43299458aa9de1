//! # Fmeta Core
//!
//! Content-addressed file metadata tracking using BLAKE3 hashing.
//!
//! This library tracks files by what they contain rather than where they
//! live, so metadata attached to a file (comments, key/value annotations,
//! tags) survives renames, moves, and copies. Original file content is
//! never copied into the repository; only identity and metadata are stored.
//!
//! Two kinds of records are kept:
//!
//! - Staging records, keyed by absolute path: the last content hash and
//!   file identity observed at that path.
//! - Object records, keyed by content hash: every path the content has
//!   been seen at, plus comments, metas, and tags.
//!
//! Comparing a path's current hash against both records classifies the
//! path into one of four states: new, same, dirty, or a new name for
//! already-known content.
//!
//! ## Example
//!
//! ```no_run
//! use fmeta_core::{FileState, Repository};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Initialize a new repository
//! let repo = Repository::init("./my-repo")?;
//!
//! // Start tracking a file
//! let tracker = repo.tracker(Path::new("./notes.txt"))?;
//! assert_eq!(tracker.state()?, FileState::New);
//! tracker.create_infos()?;
//!
//! // Attach metadata keyed by content, not path
//! tracker.add_comment("quarterly report draft")?;
//! tracker.add_meta("project", "q3-review")?;
//!
//! // The file can now be moved or copied; its metadata follows the content
//! assert_eq!(repo.query(Path::new("./notes.txt"))?, FileState::Same);
//! # Ok(())
//! # }
//! ```

mod error;
mod hash;
mod object;
mod persist;
mod repo;
mod staging;
mod tracker;

pub use error::{Error, Result};
pub use hash::ContentHash;
pub use object::{Comment, ObjectRecord, ObjectStore};
pub use repo::Repository;
pub use staging::{StagingRecord, StagingStore};
pub use tracker::{FileState, FileTracker};
