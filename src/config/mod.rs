//! Application configuration

mod app_config;
mod observability;

pub use app_config::{
    AppConfig, AuthConfig, LogFormat, LoggingConfig, SeedUser, ServerConfig, StorageBackend,
    StorageConfig,
};
pub use observability::{MetricsConfig, ObservabilityConfig, TracingConfig};
