//! Web server started once a bootstrap configuration has been resolved.
//!
//! # Responsibilities
//! - Turn the validated port into a bind address
//! - Share the validated configuration with handlers as router state
//! - Serve until the shutdown signal fires
//!
//! The server receives exactly a [`ValidatedConfig`] and nothing else.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ValidatedConfig;

/// Error type for server startup and runtime.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Validation accepts any integer; binding needs a real TCP port.
    #[error("port {0} is not a usable TCP port (expected 1-65535)")]
    InvalidPort(i32),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] io::Error),
}

/// HTTP server for the installator application.
pub struct WebServer {
    config: Arc<ValidatedConfig>,
    router: Router,
}

impl WebServer {
    /// Create a new server for the given configuration.
    pub fn new(config: ValidatedConfig) -> Self {
        let config = Arc::new(config);
        let router = Self::build_router(config.clone());
        Self { config, router }
    }

    fn build_router(config: Arc<ValidatedConfig>) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/bootstrap", get(bootstrap_handler))
            .with_state(config)
            .layer(TraceLayer::new_for_http())
    }

    /// Address derived from the configured port.
    pub fn bind_address(&self) -> Result<SocketAddr, ServerError> {
        let port = self.config.port();
        match u16::try_from(port) {
            Ok(port) if port != 0 => Ok(SocketAddr::from(([0, 0, 0, 0], port))),
            _ => Err(ServerError::InvalidPort(port)),
        }
    }

    /// Bind a listener on the configured port.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.bind_address()?;
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            conf_service_url = %self.config.conf_service_url(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Echo the bootstrap values the server was started with.
async fn bootstrap_handler(State(config): State<Arc<ValidatedConfig>>) -> Json<ValidatedConfig> {
    Json(config.as_ref().clone())
}
