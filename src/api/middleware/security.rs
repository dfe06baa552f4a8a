//! Security headers and request path hygiene

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::types::ApiError;

/// Add security headers to every response
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    // Tokens travel in these bodies
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        );
    }

    response
}

/// Reject paths that could slip past prefix-based access rules
pub async fn path_validation_middleware(request: Request<Body>, next: Next) -> Response {
    match validate_request_path(request.uri().path()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), error = ?e, "Rejected request path");
            e.into_response()
        }
    }
}

/// Path validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathValidationError {
    DotSegment,
    EmptySegment,
    InvalidCharacters,
}

/// Check a request path for dot segments, empty segments and control bytes
pub fn validate_request_path(path: &str) -> Result<(), PathValidationError> {
    if path.chars().any(|c| c.is_control()) {
        return Err(PathValidationError::InvalidCharacters);
    }

    if path.contains("//") {
        return Err(PathValidationError::EmptySegment);
    }

    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(PathValidationError::DotSegment);
    }

    Ok(())
}

impl IntoResponse for PathValidationError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::DotSegment | Self::EmptySegment => "Invalid path: path traversal detected",
            Self::InvalidCharacters => "Invalid request: prohibited characters",
        };

        ApiError::bad_request(message)
            .with_code("invalid_path")
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert_eq!(validate_request_path("/api/v1/users/me"), Ok(()));
        assert_eq!(validate_request_path("/api/v1/users/user/a.b@example.com"), Ok(()));
        assert_eq!(validate_request_path("/health"), Ok(()));
        assert_eq!(validate_request_path("/"), Ok(()));
    }

    #[test]
    fn test_dot_segments() {
        assert_eq!(
            validate_request_path("/api/v1/auth/../users"),
            Err(PathValidationError::DotSegment)
        );
        assert_eq!(
            validate_request_path("/info/./x"),
            Err(PathValidationError::DotSegment)
        );
        assert_eq!(
            validate_request_path("/api/v1/auth/.."),
            Err(PathValidationError::DotSegment)
        );
    }

    #[test]
    fn test_empty_segment() {
        assert_eq!(
            validate_request_path("/api//v1/users"),
            Err(PathValidationError::EmptySegment)
        );
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(
            validate_request_path("/api/v1/users\0"),
            Err(PathValidationError::InvalidCharacters)
        );
    }
}
