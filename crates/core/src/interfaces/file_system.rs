//! Filesystem probe interface
//!
//! Everything the resolver and the detectors need to know about the disk
//! goes through this trait. Implementations must not panic; probe failures
//! are reported as `false`, an empty listing, or an `Err` from `read_text`.

use crate::error::Result;
use std::path::Path;

/// Read-only filesystem probes
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// List the entry names of a directory, sorted by name.
    ///
    /// Returns an empty list if the directory cannot be read.
    fn list_entries(&self, path: &Path) -> Vec<String>;

    /// Read a file as UTF-8 text
    fn read_text(&self, path: &Path) -> Result<String>;

    /// Check if a path is a regular file
    fn is_file(&self, path: &Path) -> bool {
        self.exists(path) && !self.is_dir(path)
    }
}
