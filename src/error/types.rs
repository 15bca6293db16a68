//! Error types
//!
//! Defines domain-specific error types for each module of the file API.

use std::fmt;
use std::io;

/// Storage module errors, shared by the file store and the statistics engine
#[derive(Debug)]
pub enum StorageError {
    NotFound(String),
    InvalidPath(String),
    PathTraversal(String),
    IoError(io::Error),
}

impl StorageError {
    /// Classifies an I/O failure on `path`, keeping missing targets distinct
    /// from every other storage failure.
    pub fn from_io(error: io::Error, path: &str) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                StorageError::NotFound(path.to_string())
            }
            _ => StorageError::IoError(error),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(p) => write!(f, "Not found: {}", p),
            StorageError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            StorageError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}

/// Input validation errors raised before a request reaches the storage layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidPath,
    InvalidFilename,
    NoData,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidPath => write!(f, "Invalid path"),
            ValidationError::InvalidFilename => write!(f, "Invalid filename"),
            ValidationError::NoData => write!(f, "No data to write to file"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced to HTTP clients.
///
/// Each variant is a deliberate choice of what an external user gets to see;
/// the internal cause is logged where the error is produced.
#[derive(Debug)]
pub enum ApiError {
    InvalidJsonBody,
    PayloadTooLarge,
    Validation(ValidationError),
    FileNotFound,
    PathNotFound,
    CreatingOrWritingFile,
    Internal,
}

impl ApiError {
    /// Maps a failed read or delete.
    pub fn from_file_error(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(_) => ApiError::FileNotFound,
            StorageError::InvalidPath(_) | StorageError::PathTraversal(_) => {
                ApiError::Validation(ValidationError::InvalidPath)
            }
            StorageError::IoError(_) => ApiError::Internal,
        }
    }

    /// Maps a failed create/overwrite.
    pub fn from_create_error(error: StorageError) -> Self {
        match error {
            StorageError::InvalidPath(_) | StorageError::PathTraversal(_) => {
                ApiError::Validation(ValidationError::InvalidPath)
            }
            StorageError::NotFound(_) | StorageError::IoError(_) => {
                ApiError::CreatingOrWritingFile
            }
        }
    }

    /// Maps a failed statistics query.
    pub fn from_stats_error(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(_) => ApiError::PathNotFound,
            StorageError::InvalidPath(_) | StorageError::PathTraversal(_) => {
                ApiError::Validation(ValidationError::InvalidPath)
            }
            StorageError::IoError(_) => ApiError::Internal,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidJsonBody => write!(f, "Invalid JSON body"),
            ApiError::PayloadTooLarge => write!(f, "Request body too large"),
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::FileNotFound => write!(f, "File not found"),
            ApiError::PathNotFound => write!(f, "Path not found"),
            ApiError::CreatingOrWritingFile => write!(f, "Error creating/writing file"),
            ApiError::Internal => write!(f, "Internal server error"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Validation(error)
    }
}

/// Top-level error that encompasses everything that can stop the server
#[derive(Debug)]
pub enum FileApiError {
    Config(config::ConfigError),
    Storage(StorageError),
    IoError(io::Error),
}

impl fmt::Display for FileApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileApiError::Config(e) => write!(f, "Configuration error: {}", e),
            FileApiError::Storage(e) => write!(f, "Storage error: {}", e),
            FileApiError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileApiError {}

impl From<config::ConfigError> for FileApiError {
    fn from(error: config::ConfigError) -> Self {
        FileApiError::Config(error)
    }
}

impl From<StorageError> for FileApiError {
    fn from(error: StorageError) -> Self {
        FileApiError::Storage(error)
    }
}

impl From<io::Error> for FileApiError {
    fn from(error: io::Error) -> Self {
        FileApiError::IoError(error)
    }
}
