pub mod auth;
mod handlers;
mod logging;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Router, middleware};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::error::ApiError;
use crate::protocol::{Command, Reply};
use crate::store::{FileStore, Store};

pub use auth::{ApiKey, Authorized, Authorizer};

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
    authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { store, authorizer }
    }

    /// The configured authorization policy
    pub fn authorizer(&self) -> &dyn Authorizer {
        self.authorizer.as_ref()
    }

    /// Run a command against the store on the blocking pool
    pub async fn execute(&self, command: Command) -> Result<Reply, ApiError> {
        let store = Arc::clone(&self.store);
        let name = command.name();

        tokio::task::spawn_blocking(move || command.execute(store.as_ref()))
            .await
            .map_err(|e| {
                error!("{} command task failed: {}", name, e);
                ApiError::Internal
            })?
    }
}

/// Routes for the record collection
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            "/api/data",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/api/data/:id",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(logging::log_requests))
        .with_state(state)
}

/// HTTP server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
}

impl Server {
    /// Create and bind the HTTP server to the specified address
    pub async fn bind(addr: &str, state: AppState, max_body_bytes: usize) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
            router: build_router(state, max_body_bytes),
        })
    }

    /// Open the data file and bind the server described by `config`
    pub async fn start(config: &Config) -> anyhow::Result<Self> {
        let store = FileStore::open(&config.data_file)
            .with_context(|| format!("failed to initialize data file {}", config.data_file.display()))?;
        info!("Using data file {}", store.path().display());

        let state = AppState::new(
            Arc::new(store),
            Arc::new(ApiKey::new(config.api_key.clone())),
        );

        let addr = config.server_addr();
        Self::bind(&addr, state, config.max_body_bytes)
            .await
            .with_context(|| format!("failed to bind {}", addr))
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes, then drain in-flight requests
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Server is running on http://{}", self.local_addr);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
