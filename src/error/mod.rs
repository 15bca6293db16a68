//! Error handling
//!
//! Defines error types and their HTTP mapping for the file API.

pub mod handlers;
pub mod types;

pub use types::*;
