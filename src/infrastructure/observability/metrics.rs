//! Prometheus recorder and the counters emitted by the service

use std::time::Duration;

use axum::{extract::State, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use uuid::Uuid;

use crate::config::MetricsConfig;

const HTTP_REQUESTS: &str = "http_requests_total";
const HTTP_DURATION: &str = "http_request_duration_seconds";
const TOKEN_VALIDATIONS: &str = "auth_token_validations_total";
const LOGINS: &str = "auth_logins_total";

const MAX_LABEL_SEGMENTS: usize = 6;

/// Label for requests that matched no route
const UNMATCHED_ROUTE: &str = "unmatched";

/// Installed recorder plus the route it is served on
#[derive(Clone)]
pub struct MetricsEndpoint {
    handle: PrometheusHandle,
    route: String,
}

impl MetricsEndpoint {
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Router serving the exposition text
    pub fn into_router(self) -> Router {
        let route = self.route.clone();
        Router::new()
            .route(&route, get(render_metrics))
            .with_state(self)
    }
}

async fn render_metrics(State(endpoint): State<MetricsEndpoint>) -> String {
    endpoint.render()
}

/// Install the global Prometheus recorder
///
/// Returns `None` when metrics are disabled or a recorder is already
/// installed.
pub fn init_metrics(config: &MetricsConfig) -> Option<MetricsEndpoint> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            return None;
        }
    };

    gauge!("todo_auth_build_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

    let route = config.route();
    tracing::info!(route = %route, "Prometheus metrics enabled");

    Some(MetricsEndpoint { handle, route })
}

/// `route` is the matched route template, `None` for unrouted requests
pub fn record_http_request(method: &str, route: Option<&str>, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_label(route)),
        ("status", status.to_string()),
    ];

    counter!(HTTP_REQUESTS, &labels).increment(1);
    histogram!(HTTP_DURATION, &labels).record(duration.as_secs_f64());
}

/// Count one bearer-token check; `outcome` is `"authenticated"` or an
/// `AuthError::kind()`
pub fn record_token_validation(outcome: &'static str) {
    counter!(TOKEN_VALIDATIONS, "outcome" => outcome).increment(1);
}

pub fn record_login(outcome: &'static str) {
    counter!(LOGINS, "outcome" => outcome).increment(1);
}

fn route_label(route: Option<&str>) -> String {
    route.map_or_else(|| UNMATCHED_ROUTE.to_string(), path_label)
}

/// Collapse literal ids and emails left in a route
fn path_label(path: &str) -> String {
    let mut label = String::new();

    for segment in path.split('/').filter(|s| !s.is_empty()).take(MAX_LABEL_SEGMENTS) {
        label.push('/');
        if Uuid::parse_str(segment).is_ok() || segment.bytes().all(|b| b.is_ascii_digit()) {
            label.push_str("{id}");
        } else if segment.contains('@') {
            label.push_str("{email}");
        } else {
            label.push_str(segment);
        }
    }

    if label.is_empty() {
        label.push('/');
    }

    label
}
