//! Atomic JSON record I/O shared by the staging and object stores.

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read and decode a JSON record from `path`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| Error::malformed_record(path, e))
}

/// Write a JSON record atomically using tempfile.
///
/// The record is written to a temporary file in the destination's parent
/// directory and renamed into place, so readers never observe a partially
/// written record. Parent directories are created as needed.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(p) => p,
        None => return Err(Error::invalid_repo(path, "record path has no parent")),
    };
    fs::create_dir_all(parent)?;

    let json = serde_json::to_string_pretty(value)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(json.as_bytes())?;
    temp_file.write_all(b"\n")?;
    temp_file.flush()?;
    temp_file.persist(path)?;

    Ok(())
}
