// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Liveness and readiness probes.
//!
//! The only external dependency is the identity provider's key set; the
//! catalog itself lives in memory.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Degraded,
    Unavailable,
}

/// Per-dependency results.
#[derive(Debug, Serialize, ToSchema)]
pub struct Checks {
    pub service: ProbeStatus,
    /// Whether signing keys can be obtained from the provider.
    pub jwks: ProbeStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessReport {
    /// `ok` when every check passes, `degraded` otherwise.
    pub status: ProbeStatus,
    pub checks: Checks,
}

impl ReadinessReport {
    fn from_jwks(jwks_ready: bool) -> (StatusCode, Self) {
        let (code, status, jwks) = if jwks_ready {
            (StatusCode::OK, ProbeStatus::Ok, ProbeStatus::Ok)
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ProbeStatus::Degraded,
                ProbeStatus::Unavailable,
            )
        };
        let report = Self {
            status,
            checks: Checks {
                service: ProbeStatus::Ok,
                jwks,
            },
        };
        (code, report)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LivenessReport {
    pub status: ProbeStatus,
}

/// Full health report. 503 when signing keys are unobtainable, since no
/// protected route can succeed then.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All checks pass", body = ReadinessReport),
        (status = 503, description = "Signing keys unavailable", body = ReadinessReport)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadinessReport>) {
    let (code, report) = ReadinessReport::from_jwks(state.auth.is_ready().await);
    if code != StatusCode::OK {
        tracing::warn!("Health check failed: signing keys unavailable");
    }
    (code, Json(report))
}

/// Always 200 while the process serves requests.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, description = "Process is up", body = LivenessReport))
)]
pub async fn liveness() -> Json<LivenessReport> {
    Json(LivenessReport {
        status: ProbeStatus::Ok,
    })
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to authorize requests", body = ReadinessReport),
        (status = 503, description = "Signing keys unavailable", body = ReadinessReport)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadinessReport>) {
    health(state).await
}
