//! HTTP server
//!
//! Binds the listener, wires the routes to their handlers and serves until
//! shutdown.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;
use log::{error, info};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::error::FileApiError;
use crate::middleware::log_request;
use crate::protocol::{AppState, create_file, delete_file, get_file, get_stats, health_check};
use crate::server::config::ServerConfig;
use crate::storage::PathResolver;

pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Prepares the storage root and binds the listener.
    pub async fn new(config: ServerConfig) -> Result<Self, FileApiError> {
        let resolver = PathResolver::new(config.storage_root_path())?;
        let state = Arc::new(AppState::new(
            resolver,
            config.file_store(),
            config.stats_engine(),
        ));

        let addr = config.socket_addr()?;
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", addr, e);
                return Err(FileApiError::IoError(e));
            }
        };

        Ok(Self {
            listener,
            router: build_router(state, config.server.max_body_bytes),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until Ctrl-C.
    pub async fn start(self) -> Result<(), FileApiError> {
        info!("Starting RAX file API on {}", self.local_addr()?);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Routes of the file API
pub fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/file", get(get_file).delete(delete_file).post(create_file))
        .route("/stats", get(get_stats))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
