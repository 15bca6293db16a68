//! Storage result types
//!
//! Defines result structures returned by path resolution.

use std::path::PathBuf;

/// Where a logical file path lives on disk.
///
/// `directory` is always under the storage root; it may not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub directory: PathBuf,
    pub filename: String,
    pub virtual_path: String,
}

impl ResolvedLocation {
    /// Full real path of the target file
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}
