//! Access policy enforcement

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::authentication::authentication_required;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{AuthError, AuthenticationOutcome};
use crate::infrastructure::auth::Access;

/// Reject unauthenticated requests to protected paths before routing
///
/// Reads the outcome left by the authentication middleware; a missing
/// outcome counts as unauthenticated.
pub async fn access_policy_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let access = state
        .access_policy
        .classify(request.method(), request.uri().path());

    if access == Access::Public {
        return next.run(request).await;
    }

    let rejection = match request.extensions().get::<AuthenticationOutcome>() {
        Some(AuthenticationOutcome::Authenticated(_)) => None,
        Some(AuthenticationOutcome::Unauthenticated(AuthError::ExpiredToken)) => {
            Some(ApiError::from(AuthError::ExpiredToken))
        }
        _ => Some(authentication_required()),
    };

    match rejection {
        None => next.run(request).await,
        Some(error) => {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                code = error.code().unwrap_or_default(),
                "Rejected unauthenticated request to protected path"
            );
            error.into_response()
        }
    }
}
