//! Path validation
//!
//! Syntax checks for incoming logical paths and payloads. A `ValidatedPath`
//! or `ValidatedData` can only be obtained through these functions.

use crate::error::ValidationError;

/// Every stored file must carry this extension
pub const FILE_EXTENSION: &str = ".txt";

/// A logical path that is non-empty, rooted at `/` and lexically clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    path: String,
}

impl ValidatedPath {
    pub fn as_str(&self) -> &str {
        &self.path
    }

    #[cfg(test)]
    pub(crate) fn unchecked(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

/// A non-empty payload to persist verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedData {
    data: String,
}

impl ValidatedData {
    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }
}

/// Validates a logical path.
///
/// With `filename_check` the last segment must be `<stem>.txt` with a
/// non-empty stem; directory paths (for statistics) skip that check.
pub fn validate_path(raw: &str, filename_check: bool) -> Result<ValidatedPath, ValidationError> {
    if raw.is_empty() || !raw.starts_with('/') {
        return Err(ValidationError::InvalidPath);
    }

    if filename_check {
        let filename = raw.rsplit('/').next().unwrap_or("");
        match filename.strip_suffix(FILE_EXTENSION) {
            Some(stem) if !stem.is_empty() => {}
            _ => return Err(ValidationError::InvalidFilename),
        }
    }

    Ok(ValidatedPath {
        path: clean_path(raw),
    })
}

/// Validates a payload for writing.
pub fn validate_data(raw: &str) -> Result<ValidatedData, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::NoData);
    }

    Ok(ValidatedData {
        data: raw.to_string(),
    })
}

/// Lexically cleans a rooted path: repeated separators collapse, `.` segments
/// vanish, `..` removes the previous segment and never climbs above `/`.
pub fn clean_path(raw: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    format!("/{}", segments.join("/"))
}
