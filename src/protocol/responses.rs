//! Response bodies returned by the HTTP endpoints.

use serde::Serialize;

/// `GET /file` success body
#[derive(Debug, Serialize)]
pub struct FileDataResponse {
    pub data: String,
}

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
