//! Arcade Profile Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::net::SocketAddr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use arcade_profile_analyzer::api::{self, AppState};
use arcade_profile_analyzer::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("arcade_profile_analyzer=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    // Prometheus recorder must be installed before the first counter fires.
    let metrics = Metrics::init();

    let state = AppState::from_env();
    tracing::info!(
        skill_badges = state.catalog.len(),
        milestones = state.config.milestones.len(),
        open_access = state.access.is_open(),
        "configuration loaded"
    );

    let app = api::router(state).merge(metrics.router());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "listening");

    // ConnectInfo feeds the access gate with the peer address.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
