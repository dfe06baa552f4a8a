//! Authentication API endpoints
//!
//! Login and token validation. Both routes are public; the validation
//! endpoint performs its own checks and answers with a `valid` flag.

use axum::{
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::authorization_header;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::api::users::UserResponse;
use crate::domain::{AuthError, AuthenticationOutcome};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/validate-token", get(validate_token))
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub email: String,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

/// Token validation response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TokenValidationResponse {
    fn invalid(message: impl Into<String>) -> Response {
        let body = Self {
            valid: false,
            user: None,
            message: Some(message.into()),
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Exchange email and password for a bearer token
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let login = state
        .authenticator
        .login(request.email.trim(), &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: login.issued.token,
        token_type: "Bearer".to_string(),
        email: login.principal.email().to_string(),
        name: login.principal.display_name(),
        expires_at: login.issued.expires_at,
    }))
}

/// Check a bearer token and return its principal
///
/// GET /api/v1/auth/validate-token
///
/// Reuses the outcome recorded by the authentication middleware when
/// present.
pub async fn validate_token(
    State(state): State<AppState>,
    outcome: Option<Extension<AuthenticationOutcome>>,
    headers: HeaderMap,
) -> Response {
    let outcome = match outcome {
        Some(Extension(outcome)) => outcome,
        None => {
            let header = authorization_header(&headers);
            state
                .authenticator
                .authenticate_header(header.as_deref())
                .await
        }
    };

    match outcome {
        AuthenticationOutcome::Authenticated(user) => Json(TokenValidationResponse {
            valid: true,
            user: Some(UserResponse::from(&user)),
            message: None,
        })
        .into_response(),
        AuthenticationOutcome::Unauthenticated(AuthError::MissingOrMalformedHeader) => {
            TokenValidationResponse::invalid("Missing or invalid Authorization header")
        }
        AuthenticationOutcome::Unauthenticated(e) => {
            TokenValidationResponse::invalid(e.public_message())
        }
    }
}
