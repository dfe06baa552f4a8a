//! Global subscriber: env filter, pretty or JSON output, optional OTLP spans

use opentelemetry::{trace::TraceError, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{Sampler, TracerProvider},
    Resource,
};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig, TracingConfig};

/// Install the global subscriber
///
/// `RUST_LOG` wins over `logging.level`. A span exporter that cannot be
/// built is reported and skipped.
pub fn init_tracing(logging: &LoggingConfig, tracing_config: &TracingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let json = logging.format == LogFormat::Json;
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_events(FmtSpan::CLOSE)
    });
    let pretty_layer = (!json).then(|| {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
    });

    let exporter = tracing_config
        .otlp_endpoint
        .as_deref()
        .map(|endpoint| (endpoint, span_exporter(endpoint, tracing_config)));

    let (provider, export_error) = match exporter {
        Some((_, Ok(provider))) => (Some(provider), None),
        Some((endpoint, Err(e))) => (None, Some((endpoint, e))),
        None => (None, None),
    };

    let otel_layer = provider.as_ref().map(|p| {
        tracing_opentelemetry::layer().with_tracer(p.tracer(tracing_config.service_name.clone()))
    });

    if let Some(provider) = provider {
        opentelemetry::global::set_tracer_provider(provider);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(otel_layer)
        .init();

    if let Some((endpoint, e)) = export_error {
        tracing::warn!(endpoint = %endpoint, error = %e, "Span export disabled");
    } else if let Some(endpoint) = tracing_config.otlp_endpoint.as_deref() {
        tracing::info!(endpoint = %endpoint, "Exporting spans over OTLP");
    }
}

fn span_exporter(endpoint: &str, config: &TracingConfig) -> Result<TracerProvider, TraceError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    Ok(TracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(root_sampler(
            config.sampling_ratio,
        ))))
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            config.service_name.clone(),
        )]))
        .with_batch_exporter(exporter, runtime::Tokio)
        .build())
}

fn root_sampler(ratio: f64) -> Sampler {
    match ratio {
        r if r.is_nan() || r <= 0.0 => Sampler::AlwaysOff,
        r if r >= 1.0 => Sampler::AlwaysOn,
        r => Sampler::TraceIdRatioBased(r),
    }
}

/// Flush pending spans
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
}
