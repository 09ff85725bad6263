//! File system access.

mod file_system;

pub(crate) use file_system::classify;
pub use file_system::TokioFileSystem;
