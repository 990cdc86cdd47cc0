//! Quarry Server
//!
//! HTTP front end for the query-extraction and RAG pipelines. The completion
//! service is built once at start-up and injected into the handlers.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod request;

use config::ServerConfig;
use handlers::{create_router, AppState};
use quarry_domain::{CompletionError, CompletionService};
use quarry_llm::OllamaProvider;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Completion backend could not be set up
    #[error("Completion backend error: {0}")]
    Completion(#[from] CompletionError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the server against the configured Ollama backend
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;

    info!("Starting Quarry server");
    info!("Model: {} at {}", config.model.name, config.model.endpoint);

    let provider = OllamaProvider::with_timeout(
        config.model.endpoint.clone(),
        config.model.name.clone(),
        config.request_timeout(),
    )?;

    serve(config, Arc::new(provider)).await
}

/// Serve both endpoints using an already constructed completion service
pub async fn serve(
    config: ServerConfig,
    service: Arc<dyn CompletionService>,
) -> Result<(), ServerError> {
    let state = AppState::new(service, &config);
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
