use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tracing::{info, warn};

use super::records::{add_record, delete_record, list_records, update_record};
use super::state::{GuardedRecordStore, ServerState};
use super::{log_requests, require_api_key, ApiError, ServerConfig};

async fn home() -> &'static str {
    "Server is running!"
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub fn make_app(config: ServerConfig, record_store: GuardedRecordStore) -> Router {
    let state = ServerState {
        config,
        record_store,
    };

    let data_routes: Router = Router::new()
        .route("/data", get(list_records).post(add_record))
        .route("/data/{id}", put(update_record).delete(delete_record))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .with_state(state.clone());

    Router::new()
        .route("/", get(home))
        .merge(data_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {}", err);
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
    info!("Shutdown signal received, finishing in-flight requests...");
}

pub async fn run_server(config: ServerConfig, record_store: GuardedRecordStore) -> Result<()> {
    let address = config.bind_address();
    let app = make_app(config, record_store);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Ready to serve at {}!", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("Server stopped");
    Ok(())
}
