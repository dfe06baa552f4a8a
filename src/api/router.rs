//! HTTP router assembly

use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::middleware::{
    access_policy_middleware, authentication_middleware, logging_middleware, metrics_middleware,
    path_validation_middleware, security_headers_middleware,
};
use super::state::AppState;
use super::{auth, health, users};
use crate::infrastructure::observability::MetricsEndpoint;

/// Create the full router with application state
///
/// The Prometheus endpoint is merged outside the middleware stack when
/// `metrics` is set.
pub fn create_router(state: AppState, metrics: Option<MetricsEndpoint>) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route("/info", get(health::info))
        // Authentication endpoints
        .nest("/api/v1/auth", auth::create_auth_router())
        // User endpoints
        .nest("/api/v1/users", users::create_users_router())
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access_policy_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
        .layer(middleware::from_fn(path_validation_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    if let Some(endpoint) = metrics {
        router = router.merge(endpoint.into_router());
    }

    router
}
