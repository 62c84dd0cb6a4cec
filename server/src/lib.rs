//! # Leaderboard Server
//!
//! Delivery layer for the Assetto Corsa best-lap leaderboard.
//!
//! # General Infrastructure
//! - Browser posts the AC server URL to `/api/leaderboard`
//! - We rewrite it to the live-timing endpoint, pull the snapshot with a
//!   bounded timeout, and recompute both rankings per request
//! - Category assignments live in Redis, edited through the admin API
//! - Every category edit broadcasts a `cat_update` token over `/ws` so
//!   open pages re-fetch
//!
//! # Notes
//!
//! ## Redis
//! The category store is two small hashes, so a full `HGETALL` per request
//! is cheaper than any cache invalidation dance. It also gives every
//! aggregation a single consistent view of the assignments even while an
//! admin is editing.
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{delete, get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod fetch;
pub mod notify;
pub mod routes;
pub mod state;

use notify::ws_handler;
use routes::{assign_handler, categories_handler, leaderboard_handler, unassign_handler};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/api/leaderboard", post(leaderboard_handler))
        .route("/api/categories", get(categories_handler).put(assign_handler))
        .route("/api/categories/{vehicle}", delete(unassign_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
