use std::io;
use std::path::Path;

use crate::logging::{log_file_error, log_fs_modification};

/// Removes files from disk on behalf of the duplicate store
pub trait FileRemover {
    /// Check that `path` can be removed without touching it
    fn check(&self, path: &Path) -> io::Result<()>;

    /// Remove `path` from disk
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Guards destructive file operations
///
/// Only regular files are ever removed; directories and symlink targets are
/// refused before anything happens on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyManager;

impl SafetyManager {
    /// Create a new SafetyManager
    pub fn new() -> Self {
        Self
    }
}

impl FileRemover for SafetyManager {
    fn check(&self, path: &Path) -> io::Result<()> {
        let metadata = std::fs::symlink_metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let result = self.check(path).and_then(|_| std::fs::remove_file(path));
        match &result {
            Ok(()) => log_fs_modification("delete", path, None),
            Err(e) => log_file_error(path, "delete", e),
        }
        result
    }
}
