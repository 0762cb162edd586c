//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Public health check endpoint.
///
/// Pings the snippet database so load balancers see storage outages.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.snippets.ping()?;

    Ok(Json(HealthResponse {
        status: "ok",
        service: "snippetbox",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
