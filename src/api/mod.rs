// ============================================================
// API Layer — HTTP Surface
// ============================================================
// A thin axum front over the application layer. Three routes:
//
//   GET  /health   → liveness probe
//   POST /predict  → multipart image  → {"prediction", "confidence"}
//   POST /retrain  → multipart zip    → {"status", "samples", ...}
//
// This layer owns everything HTTP: multipart parsing, status
// codes, JSON shapes, and the locking that lets predictions
// keep serving the old model while a retrain runs.
//
// Reference: axum documentation (Router, State, Multipart)

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

/// Request handlers and error-to-status mapping
pub mod handlers;

/// Shared process-wide state (model, labels, retrain gate)
pub mod state;

pub use state::AppState;

// Uploaded retrain archives are full image batches; the axum
// default of 2 MiB would reject them outright.
const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/retrain", post(handlers::retrain))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind to {addr}"))?;

    tracing::info!("Listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;

    Ok(())
}
