//! Request payloads accepted by the HTTP endpoints.

use serde::Deserialize;

/// Body of `POST /file`; creating and updating a file are the same request.
#[derive(Debug, Deserialize)]
pub struct NewFileRequest {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub data: String,
}

/// `?path=` query of `GET /file`, `DELETE /file` and `GET /stats`.
///
/// A missing parameter reads as an empty path, which validation rejects.
#[derive(Debug, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub path: String,
}
