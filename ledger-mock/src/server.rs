//! Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::SharedLedger;

pub fn create_router(state: SharedLedger) -> Router {
    // Browser front-ends call the node directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Wallet + ledger contract
        .route("/rpc", post(rpc_handler))
        // Dev helper endpoints
        .route("/dev/mine", post(mine_handler))
        // Shared state
        .with_state(state)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(state: SharedLedger, host: String, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Ledger mock listening on http://{}", addr);
    log::info!("📡 JSON-RPC endpoint: POST /rpc");
    log::info!("🔨 Mining endpoint: POST /dev/mine");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve on an ephemeral localhost port in the background (for tests)
pub async fn spawn_local(state: SharedLedger) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_router(state);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("Ledger mock server error: {}", e);
        }
    });

    log::debug!("Ledger mock bound to {}", addr);
    Ok((addr, handle))
}
