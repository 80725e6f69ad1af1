//! Puzzle hunt backend entrypoint wiring the REST surface to the progress store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod puzzles;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::progress_store::ProgressStore;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(&config);

    spawn_storage_supervisor(app_state.clone(), &config);
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Run the storage supervisor in the background. The file-backed store is the
/// default; without the `file-store` feature progress lives in memory only.
fn spawn_storage_supervisor(state: state::SharedState, config: &AppConfig) {
    #[cfg(feature = "file-store")]
    {
        let path = config.data_path().clone();
        tokio::spawn(services::storage_supervisor::run(state, move || {
            let path = path.clone();
            async move {
                dao::progress_store::file::FileProgressStore::connect(path)
                    .map(|store| Arc::new(store) as Arc<dyn ProgressStore>)
            }
        }));
    }

    #[cfg(not(feature = "file-store"))]
    {
        let _ = config;
        tokio::spawn(services::storage_supervisor::run(state, move || async {
            Ok(
                Arc::new(dao::progress_store::memory::MemoryProgressStore::new())
                    as Arc<dyn ProgressStore>,
            )
        }));
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: state::SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
