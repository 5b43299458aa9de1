//! Repository management.

use crate::error::{Error, Result};
use crate::object::ObjectStore;
use crate::staging::StagingStore;
use crate::tracker::{FileState, FileTracker};
use std::fs;
use std::path::{Path, PathBuf};

/// The on-disk record format written by this version.
const RECORD_FORMAT: &str = "json";

/// A metadata repository bound to a root storage directory.
///
/// The repository owns the on-disk root exclusively but is otherwise
/// stateless: trackers are constructed per query and share nothing in
/// memory.
#[derive(Debug)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    /// Initialize a new repository at the given path.
    ///
    /// Creates the directory structure:
    /// - `staging/` for path-addressed staging records
    /// - `objects/` for content-addressed object records
    /// - `config` file with version and record format
    pub fn init<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("staging"))?;
        fs::create_dir_all(root.join("objects"))?;

        let config_path = root.join("config");
        let config_content = format!("version=1\nformat={}\n", RECORD_FORMAT);
        fs::write(&config_path, config_content)?;

        Ok(Self { root })
    }

    /// Open an existing repository at the given path.
    ///
    /// Validates the repository structure and configuration.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.exists() {
            return Err(Error::invalid_repo(&root, "directory does not exist"));
        }

        let config_path = root.join("config");
        if !config_path.exists() {
            return Err(Error::invalid_repo(&root, "config file not found"));
        }

        let config_content = fs::read_to_string(&config_path)?;
        Self::parse_config(&root, &config_content)?;

        if !root.join("staging").exists() {
            return Err(Error::invalid_repo(&root, "staging directory missing"));
        }
        if !root.join("objects").exists() {
            return Err(Error::invalid_repo(&root, "objects directory missing"));
        }

        Ok(Self { root })
    }

    /// Parse and validate the config file.
    fn parse_config(root: &Path, content: &str) -> Result<()> {
        let mut version = None;
        let mut format = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                match key.trim() {
                    "version" => version = Some(value.trim()),
                    "format" => format = Some(value.trim()),
                    _ => {}
                }
            }
        }

        if version != Some("1") {
            return Err(Error::invalid_repo(
                root,
                format!("unsupported config version: {:?}", version),
            ));
        }

        if format != Some(RECORD_FORMAT) {
            return Err(Error::invalid_repo(
                root,
                format!("unsupported record format: {:?}", format),
            ));
        }

        Ok(())
    }

    /// Get the root directory of the repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build a tracker for the given file.
    ///
    /// The path is canonicalized and its content hash computed here,
    /// once; the tracker never re-hashes.
    pub fn tracker(&self, path: &Path) -> Result<FileTracker> {
        let path = fs::canonicalize(path)?;
        FileTracker::new(
            StagingStore::new(&self.root),
            ObjectStore::new(&self.root),
            path,
        )
    }

    /// Classify a file without keeping the tracker around.
    pub fn query(&self, path: &Path) -> Result<FileState> {
        self.tracker(path)?.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_repo_init() {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().join("repo");

        let repo = Repository::init(&repo_path).unwrap();
        assert_eq!(repo.root(), repo_path);

        assert!(repo_path.join("staging").exists());
        assert!(repo_path.join("objects").exists());

        let config = fs::read_to_string(repo_path.join("config")).unwrap();
        assert!(config.contains("version=1"));
        assert!(config.contains("format=json"));
    }

    #[test]
    fn test_repo_open() {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().join("repo");

        Repository::init(&repo_path).unwrap();
        let repo = Repository::open(&repo_path).unwrap();
        assert_eq!(repo.root(), repo_path);
    }

    #[test]
    fn test_repo_open_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let result = Repository::open(temp_dir.path().join("nonexistent"));
        assert!(result.is_err());
    }

    #[test]
    fn test_repo_open_no_config() {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().join("repo");
        fs::create_dir_all(&repo_path).unwrap();

        let result = Repository::open(&repo_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_invalid_version() {
        let root = Path::new("/tmp/x");
        assert!(Repository::parse_config(root, "version=99\nformat=json\n").is_err());
    }

    #[test]
    fn test_parse_config_with_comments() {
        let root = Path::new("/tmp/x");
        Repository::parse_config(root, "# comment\nversion=1\nformat=json\n").unwrap();
    }

    #[test]
    fn test_parse_config_unknown_format() {
        let root = Path::new("/tmp/x");
        assert!(Repository::parse_config(root, "version=1\nformat=cbor\n").is_err());
    }

    #[test]
    fn test_query_and_track_through_facade() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path().join("repo")).unwrap();

        let file = temp_dir.path().join("a.txt");
        fs::write(&file, b"hello1").unwrap();

        assert_eq!(repo.query(&file).unwrap(), FileState::New);
        repo.tracker(&file).unwrap().create_infos().unwrap();
        assert_eq!(repo.query(&file).unwrap(), FileState::Same);

        fs::write(&file, b"hello2").unwrap();
        assert_eq!(repo.query(&file).unwrap(), FileState::Dirty);
    }

    #[test]
    fn test_query_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path().join("repo")).unwrap();

        let result = repo.query(&temp_dir.path().join("absent.txt"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_tracker_uses_canonical_path() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path().join("repo")).unwrap();

        let file = temp_dir.path().join("a.txt");
        fs::write(&file, b"hello1").unwrap();

        // Track via a relative-ish path spelling, query via the plain one
        let dotted = temp_dir.path().join(".").join("a.txt");
        repo.tracker(&dotted).unwrap().create_infos().unwrap();
        assert_eq!(repo.query(&file).unwrap(), FileState::Same);
    }
}
