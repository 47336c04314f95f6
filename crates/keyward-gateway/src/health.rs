// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use keyward_core::HealthStatus;
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: String,
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => "healthy".to_string(),
        Ok(HealthStatus::Degraded(why)) => format!("degraded: {why}"),
        Ok(HealthStatus::Unhealthy(why)) => format!("unhealthy: {why}"),
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            "unhealthy".to_string()
        }
    };
    let status = if storage == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthResponse {
            status: if status == StatusCode::OK { "ok" } else { "error" },
            version: env!("CARGO_PKG_VERSION"),
            storage,
        }),
    )
}
