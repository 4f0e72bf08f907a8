//! HTTP server.
//!
//! Binds a TCP listener and serves the API router until Ctrl+C.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;
use tracing::info;

use erc20_api_core::audit::AuditLogger;
use erc20_api_evm::{TokenService, WriteAccess};

use crate::routes::build_router;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Token service every endpoint delegates to.
    pub service: Arc<TokenService>,
    /// Audit logger for write operations (needs `&mut self`, so wrapped in `Mutex`).
    pub audit: Option<Arc<Mutex<AuditLogger>>>,
}

impl AppState {
    pub fn new(service: TokenService) -> Self {
        Self {
            service: Arc::new(service),
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

/// HTTP server for the token API.
pub struct HttpServer;

impl HttpServer {
    /// Serve the API on `config.listen_addr` until Ctrl+C is received.
    pub async fn start(
        config: &ServerConfig,
        state: AppState,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(config.listen_addr).await?;
        Self::serve(listener, state).await
    }

    /// Serve the API on an already bound listener.
    pub async fn serve(
        listener: TcpListener,
        state: AppState,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let local = listener.local_addr()?;
        let token = state.service.token_address();
        match state.service.access() {
            WriteAccess::Signer { address, .. } => {
                info!(%local, %token, signer = %address, "API listening, writes enabled")
            }
            WriteAccess::ReadOnly => {
                info!(%local, %token, "API listening read-only (no signing key configured)")
            }
        }
        info!("docs available at http://{local}/docs");

        axum::serve(listener, build_router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}
