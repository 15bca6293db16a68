//! Request handlers for the file API.
//!
//! Each handler validates its input, then runs the blocking storage work on
//! tokio's blocking pool and maps the outcome to an HTTP response.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use log::{error, warn};
use std::io;
use std::sync::Arc;

use crate::error::{ApiError, StorageError, ValidationError};
use crate::protocol::requests::{NewFileRequest, PathQuery};
use crate::protocol::responses::{FileDataResponse, HealthResponse};
use crate::stats::{DirectoryStatsReport, StatsEngine};
use crate::storage::{FileStore, PathResolver, validate_data, validate_path};

/// Shared, read-only state handed to every request
#[derive(Debug)]
pub struct AppState {
    pub resolver: PathResolver,
    pub store: FileStore,
    pub stats: StatsEngine,
}

impl AppState {
    pub fn new(resolver: PathResolver, store: FileStore, stats: StatsEngine) -> Self {
        Self {
            resolver,
            store,
            stats,
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /file?path=...`: returns the file content.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> Result<Json<FileDataResponse>, ApiError> {
    let raw = path_param(query)?;
    let path = validate_path(&raw, true).map_err(|e| rejected(&raw, e))?;

    let data = run_blocking(move || {
        let location = state.resolver.resolve_file(&path)?;
        state.store.read(&location)
    })
    .await
    .map_err(|e| {
        warn!("Error getting data of {}: {}", raw, e);
        ApiError::from_file_error(e)
    })?;

    Ok(Json(FileDataResponse { data }))
}

/// `DELETE /file?path=...`: removes the file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let raw = path_param(query)?;
    let path = validate_path(&raw, true).map_err(|e| rejected(&raw, e))?;

    run_blocking(move || {
        let location = state.resolver.resolve_file(&path)?;
        state.store.delete(&location)
    })
    .await
    .map_err(|e| {
        warn!("Error deleting {}: {}", raw, e);
        ApiError::from_file_error(e)
    })?;

    Ok(StatusCode::OK)
}

/// `POST /file` with `{"path": ..., "data": ...}`: creates or overwrites.
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewFileRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Error decoding JSON body: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::InvalidJsonBody
        }
    })?;

    let path = validate_path(&request.path, true).map_err(|e| rejected(&request.path, e))?;
    let data = validate_data(&request.data).map_err(|e| rejected(&request.path, e))?;

    run_blocking(move || {
        let location = state.resolver.resolve_file(&path)?;
        state.store.create(&location, &data)
    })
    .await
    .map_err(|e| {
        error!("Error creating/writing {}: {}", request.path, e);
        ApiError::from_create_error(e)
    })?;

    Ok(StatusCode::OK)
}

/// `GET /stats?path=...`: statistics for a directory.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> Result<Json<DirectoryStatsReport>, ApiError> {
    let raw = path_param(query)?;
    let path = validate_path(&raw, false).map_err(|e| rejected(&raw, e))?;

    let report = run_blocking(move || {
        let directory = state.resolver.resolve_directory(&path)?;
        state.stats.get_stats(&directory, path.as_str())
    })
    .await
    .map_err(|e| {
        warn!("Error getting stats for {}: {}", raw, e);
        ApiError::from_stats_error(e)
    })?;

    Ok(Json(report))
}

fn path_param(query: Result<Query<PathQuery>, QueryRejection>) -> Result<String, ApiError> {
    match query {
        Ok(Query(params)) => Ok(params.path),
        Err(e) => {
            warn!("Error parsing query string: {}", e);
            Err(ApiError::Validation(ValidationError::InvalidPath))
        }
    }
}

fn rejected(raw: &str, error: ValidationError) -> ApiError {
    warn!("Error validating request for {:?}: {}", raw, error);
    ApiError::Validation(error)
}

/// Runs synchronous storage work on the blocking pool.
async fn run_blocking<T, F>(task: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result,
        Err(e) => {
            error!("Storage task did not complete: {}", e);
            Err(StorageError::IoError(io::Error::other(e)))
        }
    }
}
