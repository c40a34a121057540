use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth};
use service::{
    auth::{hashing::SecretHasher, AuthService},
    file::account_store::JsonAccountRepository,
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the JSON-file account repository and hasher into a credential store.
pub async fn build_state(cfg: &AppConfig) -> Result<auth::ServerState, StartupError> {
    runtime::ensure_data_dir(&cfg.store.path)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let hasher = SecretHasher::new(&cfg.hashing).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let repo = Arc::new(JsonAccountRepository::new(&cfg.store.path));
    info!(path = %repo.path().display(), "user store ready");

    Ok(auth::ServerState { store: Arc::new(AuthService::new(repo, hasher)) })
}

/// Router with CORS and tracing layers, ready to serve or to drive from tests.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state, build_cors()))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, draining connections");
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.server.bind_addr())))?;

    let app = build_app(&cfg).await?;

    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}
