//! Router configuration for the API.

use axum::{Router, http::header, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tubelens_youtube::PlatformSource;

use crate::handlers::{
    AppState, get_channel_analytics, get_trending, get_trending_region, get_video_analytics,
    health, resolve_channel,
};

fn api_routes<S>() -> Router<AppState<S>>
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health::<S>))
        .route("/api/health", get(health::<S>))
        .route("/api/channel/{input}", get(get_channel_analytics::<S>))
        .route("/api/channel/{input}/resolve", get(resolve_channel::<S>))
        .route("/api/video/{id}", get(get_video_analytics::<S>))
        .route("/api/trending", get(get_trending::<S>))
        .route("/api/trending/{region}", get(get_trending_region::<S>))
}

/// Create the API router with the given platform source and metrics handle.
pub fn create_router<S>(state: AppState<S>, metrics_handle: PrometheusHandle) -> Router
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    api_routes::<S>()
        .route(
            "/metrics",
            get(move || async move {
                (
                    [(header::CACHE_CONTROL, "no-store")],
                    metrics_handle.render(),
                )
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create a router for testing without metrics endpoint.
#[cfg(test)]
pub fn create_test_router<S>(state: AppState<S>) -> Router
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    api_routes::<S>().with_state(state)
}
