use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use tracing::info;

use crate::{
    error::ApiResult,
    models::{DirectoryHealth, HealthResponse},
    AppState,
};

/// Health check endpoint
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("Health check requested");

    let directory = match state.directory.count().await {
        Ok(applications) => DirectoryHealth {
            reachable: true,
            applications,
        },
        Err(_) => DirectoryHealth {
            reachable: false,
            applications: 0,
        },
    };

    let response = HealthResponse {
        status: if directory.reachable {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        directory,
    };

    Ok(Json(response))
}
