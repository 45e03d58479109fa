//! Build version allocation and the three-phase publish sequence.

use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Name of the pointer file inside the output root
pub const POINTER_FILE: &str = "version";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to read version pointer: {0}")]
    ReadPointer(io::Error),

    #[error("Failed to write version pointer: {0}")]
    WritePointer(io::Error),

    #[error("Failed to remove previous version {version}: {source}")]
    Cleanup { version: String, source: io::Error },
}

/// Opaque identifier naming one immutable output tree.
///
/// UUID v7, so allocations are unique and sort by creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildVersion(String);

impl BuildVersion {
    pub fn allocate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stage-commit-cleanup publisher over the output root.
///
/// All writes for a new version land under `staging_dir` before `commit`
/// repoints the `version` file; `clean_up` removes the superseded tree only
/// afterwards. The pointer therefore never names a partially written
/// directory, and a reader always finds a complete current tree.
pub struct Publisher {
    output_root: PathBuf,
}

impl Publisher {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn pointer_path(&self) -> PathBuf {
        self.output_root.join(POINTER_FILE)
    }

    /// Directory all of a version's files are written into before commit
    pub fn staging_dir(&self, version: &BuildVersion) -> PathBuf {
        self.output_root.join(version.as_str())
    }

    /// Currently live version, if a pointer exists
    pub fn current(&self) -> Result<Option<String>, PublishError> {
        match fs::read_to_string(self.pointer_path()) {
            Ok(value) => Ok(Some(value.trim().to_string())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PublishError::ReadPointer(err)),
        }
    }

    /// Repoint the live version, returning the version it replaced.
    ///
    /// Must only be called once every file of `version` has been written.
    pub fn commit(&self, version: &BuildVersion) -> Result<Option<String>, PublishError> {
        let previous = self.current()?;
        fs::write(self.pointer_path(), version.as_str()).map_err(PublishError::WritePointer)?;
        Ok(previous.filter(|p| p != version.as_str()))
    }

    /// Remove a superseded version's output tree.
    ///
    /// An already-missing tree is fine; any other failure is reported, but
    /// the new version is live by the time this can happen.
    pub fn clean_up(&self, version: &str) -> Result<(), PublishError> {
        match fs::remove_dir_all(self.output_root.join(version)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PublishError::Cleanup {
                version: version.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_unique_and_time_ordered() {
        let a = BuildVersion::allocate();
        // v7 ids order by their millisecond timestamp
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = BuildVersion::allocate();
        assert_ne!(a, b);
        assert!(a.as_str() < b.as_str());
    }

    #[test]
    fn test_current_is_none_without_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = Publisher::new(dir.path());
        assert_eq!(publisher.current().unwrap(), None);
    }

    #[test]
    fn test_commit_writes_pointer_and_returns_previous() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = Publisher::new(dir.path());

        let first = BuildVersion::allocate();
        assert_eq!(publisher.commit(&first).unwrap(), None);
        assert_eq!(
            publisher.current().unwrap().as_deref(),
            Some(first.as_str())
        );

        let second = BuildVersion::allocate();
        assert_eq!(
            publisher.commit(&second).unwrap().as_deref(),
            Some(first.as_str())
        );
        assert_eq!(
            publisher.current().unwrap().as_deref(),
            Some(second.as_str())
        );
    }

    #[test]
    fn test_clean_up_removes_tree() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = Publisher::new(dir.path());

        let version = BuildVersion::allocate();
        let staging = publisher.staging_dir(&version);
        fs::create_dir_all(staging.join("hello")).unwrap();
        fs::write(staging.join("hello/index.html"), "<html></html>").unwrap();

        publisher.clean_up(version.as_str()).unwrap();
        assert!(!staging.exists());
    }

    #[test]
    fn test_clean_up_tolerates_missing_tree() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = Publisher::new(dir.path());
        publisher.clean_up("gone").unwrap();
    }
}
