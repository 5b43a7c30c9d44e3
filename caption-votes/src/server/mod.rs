// Server module - HTTP server setup and routing
pub mod handlers;
pub mod identity;
pub mod state;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::config::Settings;
use crate::errors::AppError;
use self::state::AppState;

pub const VOTE_PATH: &str = "/api/caption-votes";
pub const QUEUE_PATH: &str = "/api/queue";
pub const HEALTH_PATH: &str = "/health";

/// Create the axum application router with all routes and middleware
pub fn create_app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .route(VOTE_PATH, post(handlers::submit_vote))
        .route(QUEUE_PATH, get(handlers::eligible_queue))
        .route(HEALTH_PATH, get(handlers::health_check))
        .layer(create_cors_layer(settings))
        .with_state(state)
}

/// CORS layer for the configured front-end origins.
pub fn create_cors_layer(settings: &Settings) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(settings.cors_allowed_origins.clone()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, settings.user_id_header.clone()])
}

/// Run the server on the specified address until Ctrl-C.
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!("Server listening on {}", local);
    info!("- Vote endpoint: http://{}{}", local, VOTE_PATH);
    info!("- Queue endpoint: http://{}{}", local, QUEUE_PATH);
    info!("- Health endpoint: http://{}{}", local, HEALTH_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
