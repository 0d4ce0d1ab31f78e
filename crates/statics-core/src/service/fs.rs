//! FileSystem trait for abstracting file I/O.
//!
//! Defined in statics-core so services can read and write site files without
//! depending on any specific filesystem implementation. The
//! `LocalFileSystem` adapter lives in statics-infra.

use std::path::{Path, PathBuf};

/// Abstraction over filesystem operations.
///
/// This trait allows the service layer to read/write files without coupling
/// to the real filesystem, enabling easy testing with in-memory implementations.
pub trait FileSystem: Send + Sync {
    /// Write string content to a file, creating parent directories as needed.
    /// An existing file is replaced.
    fn write_file(
        &self,
        path: &Path,
        content: &str,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Read a file's content as a string.
    fn read_file(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<String, std::io::Error>> + Send;

    /// Create a directory and all parent directories.
    fn create_dir_all(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Check whether a path exists.
    fn exists(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = bool> + Send;

    /// List the regular files directly inside a directory, in whatever
    /// order the underlying listing returns them.
    fn list_files(
        &self,
        dir: &Path,
    ) -> impl std::future::Future<Output = Result<Vec<PathBuf>, std::io::Error>> + Send;
}
