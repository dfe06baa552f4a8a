//! Bearer token authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::domain::{AuthError, AuthenticationOutcome};

/// Authenticate every request and record the outcome in its extensions
///
/// Never rejects. Public/protected decisions belong to the access policy
/// layer, which must run inside this one.
pub async fn authentication_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let header = authorization_header(request.headers());
    let outcome = state
        .authenticator
        .authenticate_header(header.as_deref())
        .await;

    request.extensions_mut().insert(outcome);

    next.run(request).await
}

/// Raw `Authorization` header; non-UTF-8 values count as absent
pub fn authorization_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Extractor for the authenticated principal
///
/// Rejects with 401 when the request was not authenticated.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthenticationOutcome>() {
            Some(AuthenticationOutcome::Authenticated(user)) => Ok(CurrentUser(user.clone())),
            Some(AuthenticationOutcome::Unauthenticated(AuthError::ExpiredToken)) => {
                Err(ApiError::from(AuthError::ExpiredToken))
            }
            _ => Err(authentication_required()),
        }
    }
}

/// The 401 returned for protected resources without a principal
pub fn authentication_required() -> ApiError {
    ApiError::unauthorized(AuthError::MissingOrMalformedHeader.public_message())
        .with_code("authentication_required")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    fn parts_with(outcome: Option<AuthenticationOutcome>) -> Parts {
        let (mut parts, _) = Request::builder()
            .uri("/api/v1/users/me")
            .body(())
            .unwrap()
            .into_parts();
        if let Some(outcome) = outcome {
            parts.extensions.insert(outcome);
        }
        parts
    }

    #[test]
    fn test_authorization_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization_header(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(authorization_header(&headers).as_deref(), Some("Bearer abc"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(authorization_header(&headers), None);
    }

    #[tokio::test]
    async fn test_current_user_extracted() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "hash");
        let mut parts = parts_with(Some(AuthenticationOutcome::Authenticated(user.clone())));

        let CurrentUser(extracted) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(extracted, user);
    }

    #[tokio::test]
    async fn test_current_user_missing() {
        let mut parts = parts_with(None);

        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Authentication required");
    }

    #[tokio::test]
    async fn test_current_user_expired() {
        let mut parts = parts_with(Some(AuthenticationOutcome::Unauthenticated(
            AuthError::ExpiredToken,
        )));

        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Token expired");
    }
}
