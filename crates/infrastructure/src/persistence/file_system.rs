//! Real file system implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use apiprobe_application::ports::{FileSystem, FileSystemError};
use tokio::fs;

/// File system access through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

pub(crate) fn classify(path: &Path, error: std::io::Error) -> FileSystemError {
    match error.kind() {
        ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => FileSystemError::PermissionDenied(path.to_path_buf()),
        _ => FileSystemError::Io(error),
    }
}

impl FileSystem for TokioFileSystem {
    async fn read_file_string(&self, path: &Path) -> Result<String, FileSystemError> {
        fs::read_to_string(path).await.map_err(|e| classify(path, e))
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FileSystemError> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(path).await.map_err(|e| classify(path, e))?;

        while let Some(entry) = dir.next_entry().await? {
            entries.push(entry.path());
        }

        entries.sort();
        Ok(entries)
    }
}
