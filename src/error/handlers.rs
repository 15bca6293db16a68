//! Error handlers
//!
//! Converts API errors into HTTP status codes and JSON error bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::debug;

use crate::error::types::{ApiError, ValidationError};
use crate::protocol::responses::ErrorResponse;

/// Convert error to HTTP status code
pub fn error_to_status_code(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidJsonBody => StatusCode::BAD_REQUEST,
        ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        ApiError::FileNotFound => StatusCode::NOT_FOUND,
        ApiError::PathNotFound => StatusCode::NOT_FOUND,
        ApiError::CreatingOrWritingFile => StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message shown to the client for each error
pub fn error_to_user_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::InvalidJsonBody => "Verify your JSON payload.",
        ApiError::PayloadTooLarge => "Payload too large.",
        ApiError::Validation(ValidationError::InvalidPath) => {
            "Verify your path (must start with \"/\" and end with \"<filename>.txt\")."
        }
        ApiError::Validation(ValidationError::InvalidFilename) => "Invalid filename.",
        ApiError::Validation(ValidationError::NoData) => "There is no data to write to file.",
        ApiError::FileNotFound => "File not found.",
        ApiError::PathNotFound => "Path not found.",
        ApiError::CreatingOrWritingFile => "Error creating/writing file.",
        ApiError::Internal => "Internal server error.",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        debug!("Responding {} for {}", status, self);

        let body = ErrorResponse {
            error: error_to_user_message(&self).to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        for err in [
            ValidationError::InvalidPath,
            ValidationError::InvalidFilename,
            ValidationError::NoData,
        ] {
            assert_eq!(
                error_to_status_code(&ApiError::Validation(err)),
                StatusCode::BAD_REQUEST
            );
        }
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::PathNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::CreatingOrWritingFile.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
