//! Error types for fmeta_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using fmeta_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during repository operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// No staging record exists for the given path.
    #[error("No staging record for path: {path}")]
    StagingNotFound { path: PathBuf },

    /// No object record exists for the given content hash.
    #[error("No object record for hash: {hash}")]
    ObjectNotFound { hash: String },

    /// An object record for the given content hash already exists.
    #[error("Object record already exists for hash: {hash}")]
    ObjectExists { hash: String },

    /// A mutating operation was invoked in a state that violates its
    /// precondition. Indicates caller misuse of the state machine.
    #[error("Precondition violated: {reason}")]
    Precondition { reason: String },

    /// A persisted record could not be decoded.
    #[error("Malformed record at {path}: {source}")]
    MalformedRecord {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Record encoding failure.
    #[error("Serialization error: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    /// Invalid hash format or encoding.
    #[error("Invalid hash: {reason}")]
    InvalidHash { reason: String },

    /// Repository is invalid or not initialized.
    #[error("Invalid repository at {path}: {reason}")]
    InvalidRepo { path: PathBuf, reason: String },

    /// The tracked path is not a regular file.
    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },
}

impl Error {
    /// Create a StagingNotFound error.
    pub fn staging_not_found(path: impl Into<PathBuf>) -> Self {
        Error::StagingNotFound { path: path.into() }
    }

    /// Create an ObjectNotFound error.
    pub fn object_not_found(hash: impl Into<String>) -> Self {
        Error::ObjectNotFound { hash: hash.into() }
    }

    /// Create an ObjectExists error.
    pub fn object_exists(hash: impl Into<String>) -> Self {
        Error::ObjectExists { hash: hash.into() }
    }

    /// Create a Precondition error.
    pub fn precondition(reason: impl Into<String>) -> Self {
        Error::Precondition {
            reason: reason.into(),
        }
    }

    /// Create a MalformedRecord error.
    pub fn malformed_record(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::MalformedRecord {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidHash error.
    pub fn invalid_hash(reason: impl Into<String>) -> Self {
        Error::InvalidHash {
            reason: reason.into(),
        }
    }

    /// Create an InvalidRepo error.
    pub fn invalid_repo(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::InvalidRepo {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Error::NotAFile { path: path.into() }
    }
}

// Additional From implementations for external error types

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io { source: err.error }
    }
}
