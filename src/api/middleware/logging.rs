//! Per-request access log

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::domain::AuthenticationOutcome;

/// Headers worth logging; credentials among them are masked
const LOGGED_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "content-type",
    "content-length",
    "accept",
    "user-agent",
    "x-forwarded-for",
    "x-real-ip",
];

const MASKED_HEADERS: &[&str] = &["authorization", "proxy-authorization", "cookie"];

/// Emit one line when the request arrives and one when it completes
///
/// Sits inside authentication so the principal is known.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let principal = principal_label(request.extensions().get::<AuthenticationOutcome>());
    let request_id = request_id_from(request.headers());

    tracing::debug!(
        method = %method,
        route = %route,
        request_id = %request_id,
        headers = %header_summary(request.headers()),
        "Request received"
    );

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::warn!(
            method = %method,
            route = %route,
            principal = %principal,
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms,
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            route = %route,
            principal = %principal,
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms,
            "Request handled"
        );
    }

    response
}

/// `SetRequestIdLayer` fills the header for every request that reaches
/// the router
fn request_id_from(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn principal_label(outcome: Option<&AuthenticationOutcome>) -> String {
    outcome
        .and_then(AuthenticationOutcome::principal)
        .map(|user| user.email().to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

fn header_summary(headers: &HeaderMap) -> String {
    let mut parts = Vec::new();

    for name in LOGGED_HEADERS {
        for value in headers.get_all(*name) {
            let shown = if MASKED_HEADERS.contains(name) {
                "***"
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            parts.push(format!("{}={}", name, shown));
        }
    }

    parts.join(" ")
}
