//! Server lifecycle: open storage, bind, serve until a shutdown signal.

use std::path::Path;

use conduit_core::config::ConduitConfig;
use conduit_core::errors::StorageError;
use conduit_storage::DatabaseManager;
use tokio::net::TcpListener;
use tokio::signal;

use crate::app::build_router;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Run the API server with `config` until Ctrl+C or SIGTERM.
pub async fn run(config: ConduitConfig) -> Result<(), ServerError> {
    let db = DatabaseManager::open_with(Path::new(config.database.effective_path()), &config.database)?;
    let address = config.server.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state.clone());

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    tracing::info!(address = %address, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("server shutting down");
    if let Err(e) = state.db().checkpoint() {
        tracing::warn!(error = %e, "final WAL checkpoint failed");
    }
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
