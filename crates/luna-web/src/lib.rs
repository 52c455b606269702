//! Luna Web
//!
//! Serves the fortune teller as a single HTML page. Each browser session
//! keeps its own reading history in memory.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod page;
pub mod session;

use config::WebConfig;
use handlers::{create_router, AppState, Connector};
use luna_llm::GeminiProvider;
use luna_oracle::{connect_gemini, Instruction, OracleError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Web server error
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Instruction file could not be loaded
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Loads the instruction, builds the application state with a Gemini
/// connector and serves until the process is stopped.
pub async fn start_server(config: WebConfig) -> Result<(), WebError> {
    info!("Starting Luna web server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model: {}", config.oracle.model);

    let instruction =
        Instruction::load_or_default(&config.oracle.instruction_path, config.oracle.fields())?;

    // Missing credentials are reported per question, but say so up front too
    if let Err(e) = config.oracle.api_key() {
        warn!("{}", e);
    }

    let connector: Connector<GeminiProvider> = Arc::new(connect_gemini);
    let state = AppState::new(config.oracle.clone(), instruction, connector)
        .with_sessions(config.session_store());
    info!(
        "Sessions: up to {} kept, {}s idle timeout",
        config.max_sessions, config.session_ttl_secs
    );

    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on http://{}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| WebError::Server(e.to_string()))?;

    Ok(())
}
