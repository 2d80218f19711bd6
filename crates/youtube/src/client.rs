use std::collections::HashMap;
use std::time::Instant;

use chrono::{Duration, SecondsFormat, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;
use tubelens_observability::{labels, youtube};
use tubelens_proto::{
    ChannelRef, ChannelResource, ChannelStats, CommentRecord, CommentThread, ListResponse, Region,
    SearchResult, VideoResource, VideoStats,
};
use url::Url;

use crate::config::YouTubeConfig;
use crate::error::YouTubeError;

/// Maximum page size accepted by list endpoints.
pub const MAX_RESULTS: u32 = 50;

const VIDEO_PARTS: &str = "snippet,statistics,contentDetails";
const DETAIL_PARTS: &str = "statistics,contentDetails";

/// Data API client: one method per upstream lookup the analytics need.
#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig) -> Result<Self, YouTubeError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// GET `{base}/{resource}` and decode the list envelope.
    async fn list<T>(
        &self,
        resource: &'static str,
        params: &[(&str, String)],
    ) -> Result<ListResponse<T>, YouTubeError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self
            .base_url
            .join(resource)
            .map_err(|e| {
                YouTubeError::Config(format!("Invalid resource path {}: {}", resource, e))
            })?;

        let start = Instant::now();
        tracing::debug!(resource, ?params, "Requesting upstream");

        let response = match self
            .http
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let error = YouTubeError::from(e);
                counter!(youtube::ERRORS, labels::RESOURCE => resource).increment(1);
                tracing::error!(resource, error = %error, "Upstream request failed");
                return Err(error);
            }
        };

        let status = response.status();
        histogram!(youtube::REQUEST_DURATION, labels::RESOURCE => resource)
            .record(start.elapsed().as_secs_f64());
        counter!(
            youtube::REQUESTS,
            labels::RESOURCE => resource,
            labels::STATUS => status.as_u16().to_string()
        )
        .increment(1);

        let body = response.text().await?;
        if !status.is_success() {
            counter!(youtube::ERRORS, labels::RESOURCE => resource).increment(1);
            tracing::warn!(resource, status = status.as_u16(), "Upstream returned error status");
            return Err(YouTubeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let list = ListResponse::<T>::from_json(&body)?;
        tracing::debug!(resource, items = list.items.len(), "Upstream response decoded");
        Ok(list)
    }

    /// Fetch statistics and durations for `ids`, keyed by video id.
    async fn video_details(
        &self,
        ids: &[&str],
    ) -> Result<HashMap<String, VideoResource>, YouTubeError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let list: ListResponse<VideoResource> = self
            .list(
                "videos",
                &[("part", DETAIL_PARTS.to_string()), ("id", ids.join(","))],
            )
            .await?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|item| Some((item.id.clone()?, item)))
            .collect())
    }

    /// Convert search results to records, joining statistics by video id.
    ///
    /// Results without a video id are dropped; results the details call did not
    /// return keep zero counts. Search order is preserved.
    async fn hydrate(&self, results: &[SearchResult]) -> Result<Vec<VideoStats>, YouTubeError> {
        let ids: Vec<&str> = results.iter().filter_map(SearchResult::video_id).collect();
        let details = self.video_details(&ids).await?;

        results
            .iter()
            .filter(|r| r.video_id().is_some())
            .map(|r| {
                let detail = r.video_id().and_then(|id| details.get(id));
                VideoStats::from_search_result(r, detail).map_err(YouTubeError::from)
            })
            .collect()
    }

    async fn search_videos(
        &self,
        params: Vec<(&str, String)>,
    ) -> Result<Vec<SearchResult>, YouTubeError> {
        let mut params = params;
        params.push(("part", "snippet".to_string()));
        params.push(("type", "video".to_string()));

        let list: ListResponse<SearchResult> = self.list("search", &params).await?;
        Ok(list.items)
    }

    /// Resolve user input to a channel id, searching by name or handle when needed.
    pub async fn resolve_channel(&self, reference: &ChannelRef) -> Result<String, YouTubeError> {
        let query = match reference {
            ChannelRef::Id(id) => return Ok(id.clone()),
            ChannelRef::Handle(query) | ChannelRef::Name(query) => query,
        };

        let list: ListResponse<SearchResult> = self
            .list(
                "search",
                &[
                    ("part", "snippet".to_string()),
                    ("q", query.clone()),
                    ("type", "channel".to_string()),
                    ("maxResults", "1".to_string()),
                ],
            )
            .await?;

        let channel_id = list
            .items
            .first()
            .and_then(SearchResult::channel_id)
            .ok_or_else(|| YouTubeError::NotFound(format!("Channel {:?}", query)))?;

        tracing::info!(query = %query, channel_id, "Resolved channel");
        Ok(channel_id.to_string())
    }

    pub async fn get_channel(&self, channel_id: &str) -> Result<ChannelStats, YouTubeError> {
        let list: ListResponse<ChannelResource> = self
            .list(
                "channels",
                &[
                    ("part", "snippet,statistics".to_string()),
                    ("id", channel_id.to_string()),
                ],
            )
            .await?;

        let resource = list
            .items
            .first()
            .ok_or_else(|| YouTubeError::NotFound(format!("Channel {}", channel_id)))?;
        Ok(ChannelStats::from_resource(resource)?)
    }

    /// Latest uploads of a channel, newest first, with statistics.
    pub async fn get_recent_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<VideoStats>, YouTubeError> {
        let results = self
            .search_videos(vec![
                ("channelId", channel_id.to_string()),
                ("order", "date".to_string()),
                ("maxResults", limit.min(MAX_RESULTS).to_string()),
            ])
            .await?;
        self.hydrate(&results).await
    }

    /// Uploads of a channel ordered by relevance. Snippet data only, no statistics.
    pub async fn get_channel_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<VideoStats>, YouTubeError> {
        let results = self
            .search_videos(vec![
                ("channelId", channel_id.to_string()),
                ("order", "relevance".to_string()),
                ("maxResults", limit.min(MAX_RESULTS).to_string()),
            ])
            .await?;

        results
            .iter()
            .filter(|r| r.video_id().is_some())
            .map(|r| VideoStats::from_search_result(r, None).map_err(YouTubeError::from))
            .collect()
    }

    pub async fn get_video(&self, video_id: &str) -> Result<VideoStats, YouTubeError> {
        let list: ListResponse<VideoResource> = self
            .list(
                "videos",
                &[("part", VIDEO_PARTS.to_string()), ("id", video_id.to_string())],
            )
            .await?;

        let resource = list
            .items
            .first()
            .ok_or_else(|| YouTubeError::NotFound(format!("Video {}", video_id)))?;
        Ok(VideoStats::from_resource(resource)?)
    }

    /// Top-level comments ordered by relevance.
    ///
    /// Videos with comments disabled (403) or unknown to the comments endpoint
    /// (404) yield an empty list.
    pub async fn get_comments(
        &self,
        video_id: &str,
        limit: u32,
    ) -> Result<Vec<CommentRecord>, YouTubeError> {
        let result: Result<ListResponse<CommentThread>, _> = self
            .list(
                "commentThreads",
                &[
                    ("part", "snippet".to_string()),
                    ("videoId", video_id.to_string()),
                    ("order", "relevance".to_string()),
                    ("maxResults", limit.min(MAX_RESULTS).to_string()),
                ],
            )
            .await;

        let list = match result {
            Ok(list) => list,
            Err(YouTubeError::Status { status: 403 | 404, .. }) => {
                tracing::info!(video_id, "Comments unavailable");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        list.items
            .iter()
            .map(|thread| CommentRecord::from_thread(thread).map_err(YouTubeError::from))
            .collect()
    }

    /// Most popular videos for a region.
    ///
    /// Falls back to the most viewed uploads of the last 24 hours when the
    /// chart is empty or rejected. Both empty is `NotFound`.
    pub async fn get_trending(
        &self,
        region: Region,
        limit: u32,
    ) -> Result<Vec<VideoStats>, YouTubeError> {
        let chart: Result<ListResponse<VideoResource>, _> = self
            .list(
                "videos",
                &[
                    ("part", VIDEO_PARTS.to_string()),
                    ("chart", "mostPopular".to_string()),
                    ("regionCode", region.code().to_string()),
                    ("maxResults", limit.min(MAX_RESULTS).to_string()),
                ],
            )
            .await;

        match chart {
            Ok(list) if !list.items.is_empty() => {
                return list
                    .items
                    .iter()
                    .map(|item| VideoStats::from_resource(item).map_err(YouTubeError::from))
                    .collect();
            }
            Ok(_) => {
                tracing::warn!(region = %region, "Trending chart empty, falling back to search")
            }
            Err(e @ YouTubeError::Http(_)) => return Err(e),
            Err(e) => {
                tracing::warn!(
                    region = %region,
                    error = %e,
                    "Trending chart failed, falling back to search"
                )
            }
        }

        counter!(youtube::TRENDING_FALLBACKS, labels::REGION => region.code()).increment(1);

        let published_after =
            (Utc::now() - Duration::days(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
        let results = self
            .search_videos(vec![
                ("order", "viewCount".to_string()),
                ("publishedAfter", published_after),
                ("regionCode", region.code().to_string()),
                ("maxResults", limit.min(MAX_RESULTS).to_string()),
            ])
            .await?;

        if results.is_empty() {
            return Err(YouTubeError::NotFound(format!("Trending videos for {}", region)));
        }
        self.hydrate(&results).await
    }
}
