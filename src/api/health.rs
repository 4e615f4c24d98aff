// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Liveness and readiness checks.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// State of one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Unavailable,
}

/// Per-dependency results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub service: ComponentStatus,
    /// Whether a read transaction against the account store succeeds.
    pub store: ComponentStatus,
}

/// `/health` and `/health/ready` body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// "ok" when every check passes, otherwise "degraded".
    pub status: String,
    pub checks: HealthChecks,
}

impl ReadyResponse {
    fn from_checks(checks: HealthChecks) -> (StatusCode, Self) {
        let healthy = [checks.service, checks.store]
            .iter()
            .all(|c| *c == ComponentStatus::Ok);

        let (code, status) = if healthy {
            (StatusCode::OK, "ok")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        };
        (
            code,
            Self {
                status: status.to_string(),
                checks,
            },
        )
    }
}

/// `/health/live` body.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

async fn check_store(state: &AppState) -> ComponentStatus {
    match state.run_blocking(|store| store.health_check()).await {
        Ok(Ok(())) => ComponentStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Account store check failed");
            ComponentStatus::Unavailable
        }
        Err(_) => ComponentStatus::Unavailable,
    }
}

/// Full health report. 503 when the store cannot be read.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All checks pass", body = ReadyResponse),
        (status = 503, description = "At least one check failed", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let checks = HealthChecks {
        service: ComponentStatus::Ok,
        store: check_store(&state).await,
    };
    let (code, body) = ReadyResponse::from_checks(checks);
    (code, Json(body))
}

/// Process is up. Touches no dependency.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is running", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to serve traffic", body = ReadyResponse),
        (status = 503, description = "Not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_store_degrades_status() {
        let (code, body) = ReadyResponse::from_checks(HealthChecks {
            service: ComponentStatus::Ok,
            store: ComponentStatus::Unavailable,
        });
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["checks"]["store"], "unavailable");
    }
}
