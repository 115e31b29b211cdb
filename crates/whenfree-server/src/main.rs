//! Server binary for the "When Are You Free" meetup scheduler.
//!
//! Wires configuration, logging, the meetup store, and the HTTP API
//! together and runs them until the process is asked to stop.
//!
//! # Lifecycle
//!
//! 1. Load configuration (`whenfree-config.yaml` or `WHENFREE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the store from the snapshot file (absent file = empty store)
//! 4. Serve HTTP until `Ctrl-C` / `SIGTERM`, draining in-flight requests
//! 5. Write the snapshot once
//!
//! A failure to load or write the snapshot is fatal: it is logged and the
//! process exits non-zero.

mod config;
mod error;

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use whenfree_api::{AppState, ServerConfig};
use whenfree_store::Storage;

use crate::config::{AppConfig, LogFormat, LoggingConfig};
use crate::error::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&LoggingConfig::default());
            error!(error = %AppError::from(e), "whenfree-server failed to start");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging);

    match run(config).await {
        Ok(()) => {
            info!("whenfree-server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "whenfree-server failed");
            ExitCode::FAILURE
        }
    }
}

/// Open the store, serve until shutdown, then persist.
async fn run(config: AppConfig) -> Result<(), AppError> {
    info!(
        host = config.server.host,
        port = config.server.port,
        snapshot_path = %config.storage.snapshot_path.display(),
        conceal_existence = config.access.conceal_existence,
        "Configuration loaded"
    );

    let storage = Arc::new(Storage::open(config.storage.snapshot_file())?);
    info!(meetups = storage.len().await, "Meetup store opened");

    let state = AppState::new(Arc::clone(&storage)).with_access_policy(config.access.into());
    let server_config = ServerConfig::from(&config.server);

    let served =
        whenfree_api::start_server(&server_config, Arc::new(state), whenfree_api::shutdown_signal())
            .await;

    // Persist even if serving failed, so nothing accepted so far is lost.
    let persisted = storage.close().await;
    if persisted.is_ok() {
        info!(
            path = %config.storage.snapshot_path.display(),
            "Meetup store persisted"
        );
    }

    served?;
    persisted?;
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
