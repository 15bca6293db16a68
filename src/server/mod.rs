//! Server core functionality
//!
//! This module contains the HTTP server, its routes and its configuration.

pub mod config;
pub mod core;

pub use self::config::ServerConfig;
pub use self::core::{Server, build_router};
