//! Tubelens REST API Server
//!
//! Serves channel, video and trending analytics derived from the video platform Data API.

use std::env;

use tubelens_analytics::{AnalyticsConfig, Analyzer};
use tubelens_api::{AppState, create_router};
use tubelens_observability::{LogFormat, init_metrics, init_tracing_with};
use tubelens_youtube::{YouTubeClient, YouTubeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing_with(LogFormat::from_env());

    let yt_config = YouTubeConfig::from_env()?;
    let analytics_config = AnalyticsConfig::from_env();
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

    tracing::info!(
        api_base = %yt_config.base_url,
        timeout_secs = yt_config.timeout.as_secs(),
        trending_limit = analytics_config.trending_limit,
        bind_addr = %bind_addr,
        "Starting API server"
    );

    // Initialize metrics
    let metrics_handle = init_metrics();

    let analyzer = Analyzer::from_config(analytics_config)?;
    let client = YouTubeClient::new(yt_config)?;

    let state = AppState::new(client, analyzer);
    let app = create_router(state, metrics_handle);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
