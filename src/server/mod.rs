//! JSON API server
//!
//! One request/response frame per connection, mirroring the original REST
//! surface. Connections are handled concurrently on top of a read-mostly
//! store: search never mutates shared state, so no coordination is needed
//! beyond the database's own locking.

mod api;
mod handlers;

pub use api::{ApiClient, ApiRequest, ApiResponse};
pub use handlers::dispatch;

use crate::config::Config;
use crate::error::{Result, WheelhouseError};
use crate::query::Interpreter;
use crate::storage::StorageManager;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio::task;

/// API server over a shared storage manager
pub struct Server {
    config: Config,
    storage: Arc<StorageManager>,
    interpreter: Arc<Interpreter>,
}

impl Server {
    pub fn new(config: Config, storage: Arc<StorageManager>) -> Self {
        let interpreter = Arc::new(Interpreter::new(
            config.search.premium_price_floor,
            config.search.luxury_price_floor,
        ));
        Self {
            config,
            storage,
            interpreter,
        }
    }

    /// Bind the configured address and run until ctrl-c
    pub async fn run(&self) -> Result<()> {
        let listener =
            TcpListener::bind(&self.config.server.bind_addr)
                .await
                .map_err(|e| WheelhouseError::Io {
                    source: e,
                    context: format!("Failed to bind to {}", self.config.server.bind_addr),
                })?;

        tracing::info!("API server listening on {}", self.config.server.bind_addr);
        self.serve_on(listener).await
    }

    /// Accept loop over an already-bound listener
    pub async fn serve_on(&self, listener: TcpListener) -> Result<()> {
        let permits = Arc::new(Semaphore::new(self.config.server.max_connections));

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, addr) = accepted.map_err(|e| WheelhouseError::Io {
                        source: e,
                        context: "Failed to accept connection".to_string(),
                    })?;

                    let permit = permits.clone().acquire_owned().await.map_err(|e| {
                        WheelhouseError::Server(format!("Connection limiter closed: {}", e))
                    })?;

                    let storage = self.storage.clone();
                    let interpreter = self.interpreter.clone();
                    task::spawn(async move {
                        let _permit = permit;
                        if let Err(e) = handle_connection(stream, storage, interpreter).await {
                            tracing::debug!("Client {} error: {}", addr, e);
                        }
                    });
                }

                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    storage: Arc<StorageManager>,
    interpreter: Arc<Interpreter>,
) -> Result<()> {
    let request: ApiRequest = match api::read_frame(&mut stream).await {
        Ok(request) => request,
        Err(WheelhouseError::Json { source, .. }) => {
            // Malformed but complete frame: tell the client instead of
            // dropping the connection.
            let response = ApiResponse::error(format!("Malformed request: {}", source));
            api::write_frame(&mut stream, &response).await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    // rusqlite is synchronous; keep it off the async workers.
    let response = task::spawn_blocking(move || dispatch(&storage, &interpreter, request))
        .await
        .map_err(|e| WheelhouseError::Server(format!("Handler task failed: {}", e)))?;

    api::write_frame(&mut stream, &response).await
}
