/// Health check endpoint
///
/// ```text
/// GET /api/health
/// ```
///
/// ```json
/// {
///   "status": "ok",
///   "message": "LifeSync API is running",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```
///
/// `status` is `degraded` when the database does not answer. The endpoint
/// still returns 200 so load balancers can tell a live process from a dead
/// one.

use crate::app::AppState;
use axum::{extract::State, Json};
use lifesync_shared::db::pool;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub database: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match pool::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if connected { "ok" } else { "degraded" }.to_string(),
        message: "LifeSync API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    })
}
