//! Health, readiness and info endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;
use crate::infrastructure::auth::ALGORITHM;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_store: Option<StoreCheck>,
}

/// Result of checking the user store
#[derive(Serialize)]
pub struct StoreCheck {
    pub status: HealthStatus,
    pub latency_ms: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub token_algorithm: &'static str,
    pub token_ttl_seconds: i64,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: VERSION,
        user_store: None,
    })
}

/// GET /live
pub async fn live_check() -> StatusCode {
    StatusCode::OK
}

/// GET /ready
///
/// Ready only while the user store answers within the principal lookup
/// timeout, since no login or protected request can succeed otherwise.
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let check = check_user_store(&state).await;
    let status = check.status;

    (
        status.status_code(),
        Json(HealthResponse {
            status,
            version: VERSION,
            user_store: Some(check),
        }),
    )
}

/// GET /info
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME"),
        version: VERSION,
        token_algorithm: ALGORITHM,
        token_ttl_seconds: state.authenticator.tokens().ttl().num_seconds(),
    })
}

async fn check_user_store(state: &AppState) -> StoreCheck {
    let started = Instant::now();
    let limit = state.authenticator.lookup_timeout();

    let status = match tokio::time::timeout(limit, state.user_service.count()).await {
        Ok(Ok(_)) => HealthStatus::Healthy,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "User store readiness check failed");
            HealthStatus::Unhealthy
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = limit.as_millis() as u64,
                "User store readiness check timed out"
            );
            HealthStatus::Unhealthy
        }
    };

    StoreCheck {
        status,
        latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}
