// ABOUTME: Time endpoint server implementation
// ABOUTME: Serves authoritative server time over HTTP for client clock synchronization

use crate::server::clock::ServerClock;
use crate::server::config::TimeServerConfig;
use crate::sync::Clock;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server clock
    pub clock: Arc<ServerClock>,
}

/// Time endpoint server
pub struct TimeServer {
    /// Server configuration
    config: Arc<TimeServerConfig>,
    /// Server clock
    clock: Arc<ServerClock>,
}

impl TimeServer {
    /// Create a time server with default configuration
    pub fn new() -> Self {
        Self::with_config(TimeServerConfig::default())
    }

    /// Create a time server with custom configuration
    pub fn with_config(config: TimeServerConfig) -> Self {
        let clock = Arc::new(ServerClock::new(&config.timezone));
        Self {
            config: Arc::new(config),
            clock,
        }
    }

    /// Report time from the given clock instead of the system clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Arc::new(ServerClock::with_clock(clock, &self.config.timezone));
        self
    }

    /// Get the server configuration
    pub fn config(&self) -> &TimeServerConfig {
        &self.config
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let state = AppState {
            clock: self.clock.clone(),
        };

        Router::new()
            .route(&self.config.time_path, get(time_handler))
            .route(&self.config.server_time_path(), get(time_handler))
            .with_state(state)
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(self) -> crate::Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;

        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            log::info!("Received shutdown signal");
        };

        self.serve(listener, shutdown_signal).await
    }

    /// Serve on an already-bound listener until `shutdown` completes
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> crate::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        log::info!(
            "Time server listening on {} (endpoint: {})",
            addr,
            self.config.time_path
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        log::info!("Time server shutdown complete");
        Ok(())
    }
}

impl Default for TimeServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Current server time
async fn time_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(state.clock.time_response()),
    )
}
