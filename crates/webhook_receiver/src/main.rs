//! HTTP entry point: receives GitHub webhook deliveries, enforces
//! collaborator/release policy inline, and hands dry-run pull requests off
//! to the background queue.

mod config;
mod credentials;
mod errors;
mod hmac_verify;
mod routes;
mod state;
mod tracing_alert;

use std::sync::Arc;

pub use errors::Error;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::load().await?);
    let port = state.port;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("failed to bind listener");
    tracing::info!(port, "webhook receiver listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("failed to install SIGINT handler");
    tracing::info!("received shutdown signal");
}
