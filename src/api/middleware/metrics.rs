//! HTTP request metrics

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::infrastructure::observability::record_http_request;

/// Record count and latency for each request
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let route = matched_route(&request);

    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        route.as_deref(),
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}

/// Route template the request matched; the raw URI is never used so
/// unrouted paths cannot grow the label set
fn matched_route(request: &Request<Body>) -> Option<String> {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrouted_paths_have_no_route() {
        let routes: Vec<Option<String>> = (0..1000)
            .map(|i| {
                let request = Request::builder()
                    .uri(format!("/scan-x{}", i))
                    .body(Body::empty())
                    .unwrap();
                matched_route(&request)
            })
            .collect();

        assert!(routes.iter().all(Option::is_none));
    }
}
