//! Storage operations
//!
//! Create, read and delete for text files at resolved locations. Every
//! operation is a single attempt: failures are returned, never retried.

use log::{error, info};
use std::fs::{self, DirBuilder, OpenOptions};
use std::io::Write;

use crate::error::StorageError;
use crate::storage::results::ResolvedLocation;
use crate::storage::validation::ValidatedData;

/// Default permission bits for created directories
pub const DEFAULT_FOLDER_MODE: u32 = 0o755;
/// Default permission bits for created files
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// File operations on resolved locations.
#[derive(Debug, Clone)]
pub struct FileStore {
    folder_mode: u32,
    file_mode: u32,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_FOLDER_MODE, DEFAULT_FILE_MODE)
    }
}

impl FileStore {
    pub fn new(folder_mode: u32, file_mode: u32) -> Self {
        Self {
            folder_mode,
            file_mode,
        }
    }

    /// Creates the parent directories and writes `data`, replacing any
    /// previous content. A failed write may leave a truncated file behind.
    pub fn create(
        &self,
        location: &ResolvedLocation,
        data: &ValidatedData,
    ) -> Result<(), StorageError> {
        let mut dir_builder = DirBuilder::new();
        dir_builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            dir_builder.mode(self.folder_mode);
        }

        if let Err(e) = dir_builder.create(&location.directory) {
            error!(
                "Failed to create directory {} for {}: {}",
                location.directory.display(),
                location.virtual_path,
                e
            );
            return Err(StorageError::IoError(e));
        }

        let file_path = location.file_path();
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.file_mode);
        }

        let written = options
            .open(&file_path)
            .and_then(|mut file| file.write_all(data.as_bytes()));

        if let Err(e) = written {
            error!(
                "Failed to write file {} (real: {}): {}",
                location.virtual_path,
                file_path.display(),
                e
            );
            return Err(StorageError::IoError(e));
        }

        info!(
            "Stored {} bytes to {} (real: {})",
            data.as_bytes().len(),
            location.virtual_path,
            file_path.display()
        );
        Ok(())
    }

    /// Returns the whole file content.
    pub fn read(&self, location: &ResolvedLocation) -> Result<String, StorageError> {
        let file_path = location.file_path();
        self.require_file(location)?;

        match fs::read_to_string(&file_path) {
            Ok(content) => {
                info!(
                    "Read {} bytes from {} (real: {})",
                    content.len(),
                    location.virtual_path,
                    file_path.display()
                );
                Ok(content)
            }
            Err(e) => {
                error!(
                    "Failed to read file {} (real: {}): {}",
                    location.virtual_path,
                    file_path.display(),
                    e
                );
                Err(StorageError::from_io(e, &location.virtual_path))
            }
        }
    }

    /// Removes the single target file; directories are never touched.
    pub fn delete(&self, location: &ResolvedLocation) -> Result<(), StorageError> {
        let file_path = location.file_path();
        self.require_file(location)?;

        match fs::remove_file(&file_path) {
            Ok(()) => {
                info!(
                    "Deleted file {} (real: {})",
                    location.virtual_path,
                    file_path.display()
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to delete file {} (real: {}): {}",
                    location.virtual_path,
                    file_path.display(),
                    e
                );
                Err(StorageError::from_io(e, &location.virtual_path))
            }
        }
    }

    /// A missing target and a directory at the target are both "no such file".
    fn require_file(&self, location: &ResolvedLocation) -> Result<(), StorageError> {
        match fs::metadata(location.file_path()) {
            Ok(metadata) if metadata.is_dir() => {
                Err(StorageError::NotFound(location.virtual_path.clone()))
            }
            Ok(_) => Ok(()),
            Err(e) => Err(StorageError::from_io(e, &location.virtual_path)),
        }
    }
}
