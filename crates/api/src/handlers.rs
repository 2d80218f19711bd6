//! API request handlers.
//!
//! These handlers are generic over the platform source, allowing for easy testing
//! with mock implementations.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use tubelens_analytics::Analyzer;
use tubelens_observability::{api, labels};
use tubelens_proto::{ChannelRef, Region, VideoStats};
use tubelens_youtube::{PlatformSource, YouTubeError};

/// Uploads fetched for a channel's trend analysis.
pub const RECENT_VIDEOS_LIMIT: u32 = 10;
/// Same-channel uploads fetched as related-video candidates.
pub const SIBLING_VIDEOS_LIMIT: u32 = 5;
/// Comment threads fetched for sentiment analysis.
pub const COMMENTS_LIMIT: u32 = 50;
/// Videos fetched from the trending chart before ranking.
pub const TRENDING_FETCH_LIMIT: u32 = 50;

const ANALYTICS_CACHE: &str = "public, max-age=300";

/// Application state containing the platform source and the analyzer.
#[derive(Clone)]
pub struct AppState<S>
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    pub source: Arc<S>,
    pub analyzer: Arc<Analyzer>,
}

impl<S> AppState<S>
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    pub fn new(source: S, analyzer: Analyzer) -> Self {
        Self {
            source: Arc::new(source),
            analyzer: Arc::new(analyzer),
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        [(header::CACHE_CONTROL, "no-store")],
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

fn record_error(endpoint: &'static str, status: StatusCode) {
    counter!(
        api::ERRORS,
        labels::ENDPOINT => endpoint,
        labels::STATUS => status.as_u16().to_string()
    )
    .increment(1);
}

fn bad_request(endpoint: &'static str, message: impl Into<String>) -> Response {
    record_error(endpoint, StatusCode::BAD_REQUEST);
    error_response(StatusCode::BAD_REQUEST, message)
}

fn upstream_error(endpoint: &'static str, error: &YouTubeError) -> Response {
    let (status, message) = match error {
        YouTubeError::NotFound(_) => (StatusCode::NOT_FOUND, error.to_string()),
        e if e.is_upstream() => (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
    };

    record_error(endpoint, status);

    if status == StatusCode::NOT_FOUND {
        tracing::info!(endpoint, error = %error, "Lookup found nothing");
    } else {
        tracing::error!(endpoint, error = %error, "Upstream lookup failed");
    }
    error_response(status, message)
}

fn analytics_response<T: Serialize>(endpoint: &'static str, start: Instant, body: T) -> Response {
    histogram!(api::REQUEST_DURATION, labels::ENDPOINT => endpoint)
        .record(start.elapsed().as_secs_f64());
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, ANALYTICS_CACHE)],
        Json(body),
    )
        .into_response()
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    pub api_key_configured: bool,
}

pub async fn health<S>(State(state): State<AppState<S>>) -> impl IntoResponse
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(Health {
            status: "ok",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            api_key_configured: state.source.is_configured(),
        }),
    )
}

/// Analytics for a channel given by id, `@handle` or name.
pub async fn get_channel_analytics<S>(
    State(state): State<AppState<S>>,
    Path(input): Path<String>,
) -> Response
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    const ENDPOINT: &str = "channel";
    let start = Instant::now();
    counter!(api::REQUESTS, labels::ENDPOINT => ENDPOINT).increment(1);

    let reference = match ChannelRef::parse(&input) {
        Ok(reference) => reference,
        Err(e) => return bad_request(ENDPOINT, e.to_string()),
    };

    let channel_id = match state.source.resolve_channel(&reference).await {
        Ok(id) => id,
        Err(e) => return upstream_error(ENDPOINT, &e),
    };
    let channel = match state.source.get_channel(&channel_id).await {
        Ok(channel) => channel,
        Err(e) => return upstream_error(ENDPOINT, &e),
    };
    let videos = match state.source.get_recent_videos(&channel_id, RECENT_VIDEOS_LIMIT).await {
        Ok(videos) => videos,
        Err(e) => return upstream_error(ENDPOINT, &e),
    };
    histogram!(api::UPSTREAM_DURATION, labels::ENDPOINT => ENDPOINT)
        .record(start.elapsed().as_secs_f64());

    tracing::info!(
        input = %input,
        channel_id = %channel_id,
        videos = videos.len(),
        "Channel analytics"
    );
    let result = state.analyzer.channel_analytics(&channel, &videos, Utc::now());
    analytics_response(ENDPOINT, start, result)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResolution {
    pub original_input: String,
    pub resolved_channel_id: String,
    pub resolution_method: &'static str,
    pub channel_title: String,
}

fn resolution_method(reference: &ChannelRef) -> &'static str {
    match reference {
        ChannelRef::Id(_) => "direct channel ID",
        ChannelRef::Handle(_) => "handle search",
        ChannelRef::Name(_) => "name search",
    }
}

/// Show how channel input resolves, without computing analytics.
pub async fn resolve_channel<S>(
    State(state): State<AppState<S>>,
    Path(input): Path<String>,
) -> Response
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    const ENDPOINT: &str = "channel_resolve";
    counter!(api::REQUESTS, labels::ENDPOINT => ENDPOINT).increment(1);

    let reference = match ChannelRef::parse(&input) {
        Ok(reference) => reference,
        Err(e) => return bad_request(ENDPOINT, e.to_string()),
    };

    let channel_id = match state.source.resolve_channel(&reference).await {
        Ok(id) => id,
        Err(e) => return upstream_error(ENDPOINT, &e),
    };
    let channel = match state.source.get_channel(&channel_id).await {
        Ok(channel) => channel,
        Err(e) => return upstream_error(ENDPOINT, &e),
    };

    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(ChannelResolution {
            original_input: input,
            resolved_channel_id: channel_id,
            resolution_method: resolution_method(&reference),
            channel_title: channel.title,
        }),
    )
        .into_response()
}

/// Analytics for a single video, including comment sentiment.
///
/// Sibling and comment lookups are best-effort: their failures leave those
/// sections empty rather than failing the request.
pub async fn get_video_analytics<S>(
    State(state): State<AppState<S>>,
    Path(video_id): Path<String>,
) -> Response
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    const ENDPOINT: &str = "video";
    let start = Instant::now();
    counter!(api::REQUESTS, labels::ENDPOINT => ENDPOINT).increment(1);

    let video = match state.source.get_video(&video_id).await {
        Ok(video) => video,
        Err(e) => return upstream_error(ENDPOINT, &e),
    };

    let siblings: Vec<VideoStats> = if video.channel_id.is_empty() {
        Vec::new()
    } else {
        state
            .source
            .get_channel_videos(&video.channel_id, SIBLING_VIDEOS_LIMIT)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(video_id = %video_id, error = %e, "Failed to fetch channel videos");
                Vec::new()
            })
    };

    let comments = state
        .source
        .get_comments(&video_id, COMMENTS_LIMIT)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(video_id = %video_id, error = %e, "Failed to fetch comments");
            Vec::new()
        });
    histogram!(api::UPSTREAM_DURATION, labels::ENDPOINT => ENDPOINT)
        .record(start.elapsed().as_secs_f64());

    tracing::info!(video_id = %video_id, comments = comments.len(), "Video analytics");
    let result = state.analyzer.video_analytics(&video, &comments, &siblings, Utc::now());
    analytics_response(ENDPOINT, start, result)
}

const TRENDING_ENDPOINT: &str = "trending";

async fn trending_for<S>(state: AppState<S>, region: Region) -> Response
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    const ENDPOINT: &str = TRENDING_ENDPOINT;
    let start = Instant::now();
    counter!(
        api::REQUESTS,
        labels::ENDPOINT => ENDPOINT,
        labels::REGION => region.code()
    )
    .increment(1);

    let videos = match state.source.get_trending(region, TRENDING_FETCH_LIMIT).await {
        Ok(videos) => videos,
        Err(e) => return upstream_error(ENDPOINT, &e),
    };
    histogram!(api::UPSTREAM_DURATION, labels::ENDPOINT => ENDPOINT)
        .record(start.elapsed().as_secs_f64());

    tracing::info!(region = %region, videos = videos.len(), "Trending analytics");
    let result = state.analyzer.trending_analytics(region, &videos, Utc::now());
    analytics_response(ENDPOINT, start, result)
}

/// Trending analytics for the default region.
pub async fn get_trending<S>(State(state): State<AppState<S>>) -> Response
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    trending_for(state, Region::default()).await
}

/// Trending analytics for a region code (`US`, `gb`, `uk`, ...).
pub async fn get_trending_region<S>(
    State(state): State<AppState<S>>,
    Path(region): Path<String>,
) -> Response
where
    S: PlatformSource + Clone + Send + Sync + 'static,
{
    match region.parse::<Region>() {
        Ok(region) => trending_for(state, region).await,
        Err(e) => bad_request(TRENDING_ENDPOINT, e.to_string()),
    }
}
