//! HTTP protocol layer
//!
//! Request/response payloads and the handlers behind each route.

pub mod handlers;
pub mod requests;
pub mod responses;

pub use handlers::{AppState, create_file, delete_file, get_file, get_stats, health_check};
