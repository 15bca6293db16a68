//! Path resolution
//!
//! Maps validated logical paths onto real paths under the storage root and
//! enforces confinement: segments are normalised first, then the result and
//! its deepest existing ancestor are checked against the canonical root.

use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;
use crate::storage::results::ResolvedLocation;
use crate::storage::validation::ValidatedPath;

/// Resolves logical paths against a fixed storage root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Creates the storage root if needed and pins its canonical form.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();

        if !root.exists() {
            fs::create_dir_all(root)?;
            info!(
                "Storage root {} did not exist - it has been created",
                root.display()
            );
        }

        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(StorageError::InvalidPath(root.display().to_string()));
        }

        info!("Storage root directory: {}", root.display());
        Ok(Self { root })
    }

    /// Canonical storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Splits a logical file path into its directory under the root and its
    /// leaf filename.
    pub fn resolve_file(&self, path: &ValidatedPath) -> Result<ResolvedLocation, StorageError> {
        let virtual_path = path.as_str();
        let (parent, filename) = virtual_path.rsplit_once('/').unwrap_or(("", virtual_path));

        if filename.is_empty() || !is_plain_segment(filename) {
            return Err(StorageError::InvalidPath(virtual_path.to_string()));
        }

        let location = ResolvedLocation {
            directory: self.confine(virtual_path, parent)?,
            filename: filename.to_string(),
            virtual_path: virtual_path.to_string(),
        };

        // The leaf itself may be a symlink
        self.ensure_within_root(virtual_path, &location.file_path())?;

        Ok(location)
    }

    /// Resolves a logical directory path; a trailing slash is ignored.
    pub fn resolve_directory(&self, path: &ValidatedPath) -> Result<PathBuf, StorageError> {
        self.confine(path.as_str(), path.as_str())
    }

    fn confine(&self, virtual_path: &str, segments: &str) -> Result<PathBuf, StorageError> {
        let mut resolved = self.root.clone();

        for segment in segments.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    resolved.pop();
                }
                s if is_plain_segment(s) => resolved.push(s),
                _ => return Err(self.traversal(virtual_path)),
            }

            if !resolved.starts_with(&self.root) {
                return Err(self.traversal(virtual_path));
            }
        }

        self.ensure_within_root(virtual_path, &resolved)?;
        Ok(resolved)
    }

    /// Canonicalises the deepest existing ancestor of `path` and makes sure
    /// it did not leave the root through a symlink.
    fn ensure_within_root(&self, virtual_path: &str, path: &Path) -> Result<(), StorageError> {
        for ancestor in path.ancestors() {
            match ancestor.canonicalize() {
                Ok(canonical) if canonical.starts_with(&self.root) => return Ok(()),
                Ok(_) => return Err(self.traversal(virtual_path)),
                // Dangling link: its target is unknown, so it is never followed
                Err(e) if e.kind() == io::ErrorKind::NotFound && ancestor.is_symlink() => {
                    return Err(self.traversal(virtual_path));
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(StorageError::IoError(e)),
            }
        }

        Err(self.traversal(virtual_path))
    }

    fn traversal(&self, virtual_path: &str) -> StorageError {
        warn!(
            "Rejected path {} outside storage root {}",
            virtual_path,
            self.root.display()
        );
        StorageError::PathTraversal(virtual_path.to_string())
    }
}

/// True if `segment` is a single ordinary path component on this platform.
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver() -> (TempDir, PathResolver) {
        let dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(dir.path()).unwrap();
        (dir, resolver)
    }

    #[test]
    fn test_new_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("filesys");
        let resolver = PathResolver::new(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(resolver.root(), root.canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_file_splits_directory_and_filename() {
        let (_dir, resolver) = resolver();
        let location = resolver
            .resolve_file(&ValidatedPath::unchecked("/this/is/a/file.txt"))
            .unwrap();

        assert_eq!(location.filename, "file.txt");
        assert_eq!(location.directory, resolver.root().join("this/is/a"));
        assert_eq!(
            location.file_path(),
            resolver.root().join("this/is/a/file.txt")
        );
    }

    #[test]
    fn test_resolve_file_at_root() {
        let (_dir, resolver) = resolver();
        let location = resolver
            .resolve_file(&ValidatedPath::unchecked("/a.txt"))
            .unwrap();

        assert_eq!(location.directory, resolver.root());
    }

    #[test]
    fn test_parent_segments_stay_inside_root() {
        let (_dir, resolver) = resolver();
        let location = resolver
            .resolve_file(&ValidatedPath::unchecked("/a/b/../c/file.txt"))
            .unwrap();

        assert!(location.directory.starts_with(resolver.root()));
        assert_eq!(location.directory, resolver.root().join("a/c"));
    }

    #[test]
    fn test_escaping_paths_are_rejected() {
        let (_dir, resolver) = resolver();

        for raw in ["/../outside.txt", "/a/../../outside.txt", "/../../../etc/x.txt"] {
            let result = resolver.resolve_file(&ValidatedPath::unchecked(raw));
            assert!(
                matches!(result, Err(StorageError::PathTraversal(_))),
                "{raw} was not rejected"
            );
        }

        let result = resolver.resolve_directory(&ValidatedPath::unchecked("/.."));
        assert!(matches!(result, Err(StorageError::PathTraversal(_))));
    }

    #[test]
    fn test_dot_dot_filename_is_invalid() {
        let (_dir, resolver) = resolver();
        let result = resolver.resolve_file(&ValidatedPath::unchecked("/a/.."));
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[test]
    fn test_resolve_directory_ignores_trailing_slash() {
        let (_dir, resolver) = resolver();
        let with_slash = resolver
            .resolve_directory(&ValidatedPath::unchecked("/docs/"))
            .unwrap();
        let without = resolver
            .resolve_directory(&ValidatedPath::unchecked("/docs"))
            .unwrap();

        assert_eq!(with_slash, without);
        assert_eq!(
            resolver
                .resolve_directory(&ValidatedPath::unchecked("/"))
                .unwrap(),
            resolver.root()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_root_is_rejected() {
        let outside = TempDir::new().unwrap();
        let (_dir, resolver) = resolver();
        std::os::unix::fs::symlink(outside.path(), resolver.root().join("escape")).unwrap();

        let result = resolver.resolve_file(&ValidatedPath::unchecked("/escape/file.txt"));
        assert!(matches!(result, Err(StorageError::PathTraversal(_))));

        let result = resolver.resolve_directory(&ValidatedPath::unchecked("/escape"));
        assert!(matches!(result, Err(StorageError::PathTraversal(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_rejected() {
        let (_dir, resolver) = resolver();
        std::os::unix::fs::symlink("/nonexistent/target.txt", resolver.root().join("link.txt"))
            .unwrap();

        let result = resolver.resolve_file(&ValidatedPath::unchecked("/link.txt"));
        assert!(matches!(result, Err(StorageError::PathTraversal(_))));
    }
}
