//! File system abstraction port.

use std::future::Future;
use std::path::{Path, PathBuf};

/// Error type for file system operations.
#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    /// File not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only file access used to load schema documents.
///
/// This trait allows mocking file system access in tests.
pub trait FileSystem: Send + Sync {
    /// Reads a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    fn read_file_string(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<String, FileSystemError>> + Send;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Lists entries in a directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn read_dir(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Vec<PathBuf>, FileSystemError>> + Send;
}
