//! Observability setup for Tubelens.
//!
//! Tracing subscriber configuration, the Prometheus recorder, and the metric
//! and label names shared by the API server and the platform client.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format, selected with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else is human-readable.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(value) if value.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing with JSON output and env filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Initialize tracing with human-readable output (for development).
pub fn init_tracing_dev() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn init_tracing_with(format: LogFormat) {
    match format {
        LogFormat::Json => init_tracing(),
        LogFormat::Pretty => init_tracing_dev(),
    }
}

/// Initialize Prometheus metrics exporter.
/// Returns a handle that can render metrics in Prometheus format.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Common metrics labels.
pub mod labels {
    pub const ENDPOINT: &str = "endpoint";
    pub const STATUS: &str = "status";
    pub const RESOURCE: &str = "resource";
    pub const REGION: &str = "region";
}

/// Metric names for the API service.
pub mod api {
    pub const REQUESTS: &str = "api_requests_total";
    pub const REQUEST_DURATION: &str = "api_request_duration_seconds";
    pub const UPSTREAM_DURATION: &str = "api_upstream_fetch_duration_seconds";
    pub const ERRORS: &str = "api_errors_total";
}

/// Metric names for the platform Data API client.
pub mod youtube {
    pub const REQUESTS: &str = "youtube_requests_total";
    pub const REQUEST_DURATION: &str = "youtube_request_duration_seconds";
    pub const ERRORS: &str = "youtube_errors_total";
    pub const TRENDING_FALLBACKS: &str = "youtube_trending_fallback_total";
}
