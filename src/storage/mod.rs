//! File system storage management
//!
//! Handles path validation, confinement to the storage root and file
//! operations.

pub mod operations;
pub mod resolver;
pub mod results;
pub mod validation;

// Re-export commonly used types
pub use operations::FileStore;
pub use resolver::PathResolver;
pub use results::ResolvedLocation;
pub use validation::{ValidatedData, ValidatedPath, validate_data, validate_path};
