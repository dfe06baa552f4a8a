//! Tracing subscriber and Prometheus metrics

mod metrics;
mod tracing_setup;

pub use metrics::{
    init_metrics, record_http_request, record_login, record_token_validation, MetricsEndpoint,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
