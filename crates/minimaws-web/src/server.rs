//! Page server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and runs the Axum
//! server until `Ctrl-C` is received.

use std::io;
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the page server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `127.0.0.1`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Address`] if host and port do not form a
    /// valid address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|source| ServerError::Address { addr, source })
    }
}

/// Start the page server.
///
/// Serves requests on the configured address until `Ctrl-C`; in-flight
/// requests finish before this returns.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(%addr, "minimaws listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("minimaws stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Page server start-up and runtime failures.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Host and port do not parse as a socket address.
    #[error("invalid listen address {addr:?}: {source}")]
    Address {
        /// The `host:port` string that was rejected.
        addr: String,
        /// Parse failure.
        source: AddrParseError,
    },

    /// The listener could not be bound.
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying socket error.
        source: io::Error,
    },

    /// Accepting or serving connections failed.
    #[error("page server failed: {0}")]
    Serve(#[source] io::Error),
}
