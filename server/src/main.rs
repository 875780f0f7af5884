mod app;
mod config;
mod routes;
mod state;

use regionmap_shared::{BUNDLED_MAP_NAME, GeoFeatureCollection, MapRegistry};
use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut registry = MapRegistry::default();
    let map = registry.register(BUNDLED_MAP_NAME, GeoFeatureCollection::bundled());
    if map.catalog.is_empty() {
        tracing::warn!(map = %map.name, "bundled dataset has no named regions");
    } else {
        tracing::info!(map = %map.name, regions = map.catalog.len(), "bundled dataset loaded");
    }

    let static_dir = config::static_dir();
    if !static_dir.is_dir() {
        tracing::warn!(dir = %static_dir.display(), "static directory missing; build the client first");
    }

    let app = app::build_app(AppState::new(map), &static_dir);

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!("regionmap server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
