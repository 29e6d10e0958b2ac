use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StateError;

/// Last package count a notification was sent for, kept as decimal text in
/// a single file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the state file holding `0` (and its parent directory) unless
    /// it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] when the directory or file cannot be created.
    pub fn ensure_exists(&self) -> Result<(), StateError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error("create", source))?;
        }
        debug!(path = %self.path.display(), "initializing state file");
        fs::write(&self.path, "0").map_err(|source| self.io_error("create", source))
    }

    /// # Errors
    ///
    /// Returns [`StateError::Io`] when the file exists but cannot be read,
    /// and [`StateError::Parse`] when it does not hold a non-negative integer.
    pub fn read(&self) -> Result<Option<u32>, StateError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error("read", source)),
        };
        let count = contents
            .trim()
            .parse::<u32>()
            .map_err(|source| StateError::Parse {
                path: self.path.clone(),
                contents: contents.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), count, "read stored count");
        Ok(Some(count))
    }

    /// # Errors
    ///
    /// Returns [`StateError::Io`] when the file cannot be written.
    pub fn write(&self, count: u32) -> Result<(), StateError> {
        debug!(path = %self.path.display(), count, "storing notified count");
        fs::write(&self.path, count.to_string()).map_err(|source| self.io_error("write", source))
    }

    /// Remove the state file. Removing a missing file succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] for any failure other than the file being absent.
    pub fn clear(&self) -> Result<(), StateError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared state file");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error("remove", source)),
        }
    }

    fn io_error(&self, op: &'static str, source: std::io::Error) -> StateError {
        StateError::Io {
            op,
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::StateStore;
    use crate::error::StateError;

    fn store() -> (TempDir, StateStore) {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => panic!("tempdir: {err}"),
        };
        let store = StateStore::new(dir.path().join("nested").join("notifier.state"));
        (dir, store)
    }

    #[test]
    fn read_missing_file_is_none() {
        let (_dir, store) = store();
        assert!(matches!(store.read(), Ok(None)));
    }

    #[test]
    fn ensure_exists_creates_parent_and_zero() {
        let (_dir, store) = store();
        assert!(store.ensure_exists().is_ok());
        assert_eq!(fs::read_to_string(store.path()).ok().as_deref(), Some("0"));
        assert!(matches!(store.read(), Ok(Some(0))));
    }

    #[test]
    fn ensure_exists_keeps_existing_value() {
        let (_dir, store) = store();
        assert!(store.ensure_exists().is_ok());
        assert!(store.write(12).is_ok());
        assert!(store.ensure_exists().is_ok());
        assert!(matches!(store.read(), Ok(Some(12))));
    }

    #[test]
    fn write_then_read_returns_count() {
        let (_dir, store) = store();
        assert!(store.ensure_exists().is_ok());
        for count in [0, 1, 37, u32::MAX] {
            assert!(store.write(count).is_ok());
            assert_eq!(store.read().ok().flatten(), Some(count));
        }
    }

    #[test]
    fn read_tolerates_surrounding_whitespace() {
        let (_dir, store) = store();
        assert!(store.ensure_exists().is_ok());
        assert!(fs::write(store.path(), " 5\n").is_ok());
        assert!(matches!(store.read(), Ok(Some(5))));
    }

    #[test]
    fn read_rejects_garbage() {
        let (_dir, store) = store();
        assert!(store.ensure_exists().is_ok());
        assert!(fs::write(store.path(), "-3").is_ok());
        match store.read() {
            Err(StateError::Parse { contents, .. }) => assert_eq!(contents, "-3"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = store();
        assert!(store.ensure_exists().is_ok());
        assert!(store.clear().is_ok());
        assert!(!store.path().exists());
        assert!(store.clear().is_ok());
    }
}
