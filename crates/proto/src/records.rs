//! Normalized records consumed by the analytics layer.
//!
//! Missing fields are replaced with defaults (0 for counts, [`UNKNOWN`] for
//! display text, `None` for timestamps). Values that are present but cannot be
//! valid (negative counts, malformed durations) are rejected with [`ParseError`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ParseError;
use crate::parse::{parse_count, parse_iso8601_duration, parse_optional_timestamp};
use crate::payload::{ChannelResource, CommentThread, SearchResult, VideoResource, VideoSnippet};

/// Placeholder for missing display text.
pub const UNKNOWN: &str = "Unknown";

fn text_or_unknown(value: Option<&String>) -> String {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Statistics for a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStats {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration_seconds: u64,
}

impl VideoStats {
    /// A video with the given id, zero counts and unknown metadata.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: UNKNOWN.to_string(),
            description: String::new(),
            channel_id: String::new(),
            channel_title: UNKNOWN.to_string(),
            published_at: None,
            thumbnail_url: None,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            duration_seconds: 0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_channel(mut self, id: impl Into<String>, title: impl Into<String>) -> Self {
        self.channel_id = id.into();
        self.channel_title = title.into();
        self
    }

    pub fn with_counts(mut self, views: u64, likes: u64, comments: u64) -> Self {
        self.view_count = views;
        self.like_count = likes;
        self.comment_count = comments;
        self
    }

    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration_seconds = seconds;
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Build from a `videos` resource (`snippet,statistics,contentDetails`).
    pub fn from_resource(resource: &VideoResource) -> Result<Self, ParseError> {
        let mut video = Self::new(resource.id.clone().unwrap_or_default());
        if let Some(snippet) = &resource.snippet {
            video.apply_snippet(snippet)?;
        }
        video.apply_details(resource)?;
        Ok(video)
    }

    /// Build from a `search` result, hydrated with statistics from a `videos` resource.
    ///
    /// The search snippet wins for metadata; `details` only supplies counts and duration.
    pub fn from_search_result(
        result: &SearchResult,
        details: Option<&VideoResource>,
    ) -> Result<Self, ParseError> {
        let mut video = Self::new(result.video_id().unwrap_or_default());
        if let Some(snippet) = &result.snippet {
            video.apply_snippet(snippet)?;
        }
        if let Some(details) = details {
            video.apply_details(details)?;
        }
        Ok(video)
    }

    fn apply_snippet(&mut self, snippet: &VideoSnippet) -> Result<(), ParseError> {
        self.title = text_or_unknown(snippet.title.as_ref());
        self.description = snippet.description.clone().unwrap_or_default();
        self.channel_id = snippet.channel_id.clone().unwrap_or_default();
        self.channel_title = text_or_unknown(snippet.channel_title.as_ref());
        self.published_at = parse_optional_timestamp(snippet.published_at.as_deref())?;
        self.thumbnail_url = snippet
            .thumbnails
            .as_ref()
            .and_then(|t| t.best_url())
            .map(str::to_string);
        Ok(())
    }

    fn apply_details(&mut self, resource: &VideoResource) -> Result<(), ParseError> {
        if let Some(stats) = &resource.statistics {
            self.view_count = parse_count("viewCount", stats.view_count.as_ref())?;
            self.like_count = parse_count("likeCount", stats.like_count.as_ref())?;
            self.comment_count = parse_count("commentCount", stats.comment_count.as_ref())?;
        }
        self.duration_seconds = match resource
            .content_details
            .as_ref()
            .and_then(|d| d.duration.as_deref())
        {
            Some(duration) => parse_iso8601_duration(duration)?,
            None => 0,
        };
        Ok(())
    }
}

/// Channel-level statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub id: String,
    pub title: String,
    pub description: String,
    pub custom_url: String,
    pub country: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
}

impl ChannelStats {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: UNKNOWN.to_string(),
            description: String::new(),
            custom_url: String::new(),
            country: UNKNOWN.to_string(),
            published_at: None,
            thumbnail_url: None,
            subscriber_count: 0,
            view_count: 0,
            video_count: 0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_counts(mut self, subscribers: u64, views: u64, videos: u64) -> Self {
        self.subscriber_count = subscribers;
        self.view_count = views;
        self.video_count = videos;
        self
    }

    /// Build from a `channels` resource (`snippet,statistics`).
    pub fn from_resource(resource: &ChannelResource) -> Result<Self, ParseError> {
        let mut channel = Self::new(resource.id.clone().unwrap_or_default());

        if let Some(snippet) = &resource.snippet {
            channel.title = text_or_unknown(snippet.title.as_ref());
            channel.description = snippet.description.clone().unwrap_or_default();
            channel.custom_url = snippet.custom_url.clone().unwrap_or_default();
            channel.country = text_or_unknown(snippet.country.as_ref());
            channel.published_at = parse_optional_timestamp(snippet.published_at.as_deref())?;
            channel.thumbnail_url = snippet
                .thumbnails
                .as_ref()
                .and_then(|t| t.best_url())
                .map(str::to_string);
        }

        if let Some(stats) = &resource.statistics {
            channel.subscriber_count =
                parse_count("subscriberCount", stats.subscriber_count.as_ref())?;
            channel.view_count = parse_count("viewCount", stats.view_count.as_ref())?;
            channel.video_count = parse_count("videoCount", stats.video_count.as_ref())?;
        }

        Ok(channel)
    }
}

/// A top-level comment on a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub text: String,
    pub author: String,
    pub like_count: u64,
    pub published_at: Option<DateTime<Utc>>,
}

impl CommentRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: UNKNOWN.to_string(),
            like_count: 0,
            published_at: None,
        }
    }

    pub fn with_likes(mut self, likes: u64) -> Self {
        self.like_count = likes;
        self
    }

    /// Build from a `commentThreads` item. The original text is preferred over
    /// the HTML-rendered display text.
    pub fn from_thread(thread: &CommentThread) -> Result<Self, ParseError> {
        let Some(snippet) = thread.comment_snippet() else {
            return Ok(Self::new(String::new()));
        };

        let text = snippet
            .text_original
            .as_ref()
            .or(snippet.text_display.as_ref())
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            text,
            author: text_or_unknown(snippet.author_display_name.as_ref()),
            like_count: parse_count("likeCount", snippet.like_count.as_ref())?,
            published_at: parse_optional_timestamp(snippet.published_at.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ListResponse;

    mod video_stats_tests {
        use super::*;

        #[test]
        fn from_resource_extracts_all_fields() {
            let json = r#"{"items": [{
                "id": "vid1",
                "snippet": {
                    "publishedAt": "2024-01-01T00:00:00Z",
                    "channelId": "UCabc",
                    "title": "A Video",
                    "description": "desc",
                    "channelTitle": "A Channel",
                    "thumbnails": { "high": { "url": "https://example.com/h.jpg" } }
                },
                "statistics": { "viewCount": "1000", "likeCount": "50", "commentCount": "7" },
                "contentDetails": { "duration": "PT10M" }
            }]}"#;
            let response = ListResponse::<VideoResource>::from_json(json).unwrap();
            let video = VideoStats::from_resource(&response.items[0]).unwrap();

            assert_eq!(video.id, "vid1");
            assert_eq!(video.title, "A Video");
            assert_eq!(video.channel_id, "UCabc");
            assert_eq!(video.channel_title, "A Channel");
            assert_eq!(video.published_at.unwrap().timestamp(), 1_704_067_200);
            assert_eq!(video.thumbnail_url.as_deref(), Some("https://example.com/h.jpg"));
            assert_eq!(video.view_count, 1000);
            assert_eq!(video.like_count, 50);
            assert_eq!(video.comment_count, 7);
            assert_eq!(video.duration_seconds, 600);
        }

        #[test]
        fn missing_sections_use_defaults() {
            let video = VideoStats::from_resource(&VideoResource {
                id: Some("bare".to_string()),
                ..Default::default()
            })
            .unwrap();

            assert_eq!(video.title, UNKNOWN);
            assert_eq!(video.channel_title, UNKNOWN);
            assert_eq!(video.published_at, None);
            assert_eq!(video.view_count, 0);
            assert_eq!(video.like_count, 0);
            assert_eq!(video.comment_count, 0);
            assert_eq!(video.duration_seconds, 0);
        }

        #[test]
        fn hidden_like_count_defaults_to_zero() {
            let json = r#"{"items": [{
                "id": "vid2",
                "statistics": { "viewCount": "10", "commentCount": "1" }
            }]}"#;
            let response = ListResponse::<VideoResource>::from_json(json).unwrap();
            let video = VideoStats::from_resource(&response.items[0]).unwrap();

            assert_eq!(video.view_count, 10);
            assert_eq!(video.like_count, 0);
        }

        #[test]
        fn negative_count_is_rejected() {
            let json = r#"{"items": [{ "id": "bad", "statistics": { "viewCount": -1 } }]}"#;
            let response = ListResponse::<VideoResource>::from_json(json).unwrap();
            assert!(matches!(
                VideoStats::from_resource(&response.items[0]),
                Err(ParseError::InvalidCount { field: "viewCount", .. })
            ));
        }

        #[test]
        fn malformed_duration_is_rejected() {
            let json = r#"{"items": [{ "id": "bad", "contentDetails": { "duration": "ten minutes" } }]}"#;
            let response = ListResponse::<VideoResource>::from_json(json).unwrap();
            assert!(matches!(
                VideoStats::from_resource(&response.items[0]),
                Err(ParseError::InvalidDuration(_))
            ));
        }

        #[test]
        fn from_search_result_merges_details() {
            let search = r#"{"items": [{
                "id": { "kind": "youtube#video", "videoId": "s1" },
                "snippet": { "title": "Search Title", "channelTitle": "Chan" }
            }]}"#;
            let details = r#"{"items": [{
                "id": "s1",
                "snippet": { "title": "Ignored Title" },
                "statistics": { "viewCount": "42" },
                "contentDetails": { "duration": "PT30S" }
            }]}"#;
            let search = ListResponse::<SearchResult>::from_json(search).unwrap();
            let details = ListResponse::<VideoResource>::from_json(details).unwrap();

            let video =
                VideoStats::from_search_result(&search.items[0], details.items.first()).unwrap();

            assert_eq!(video.id, "s1");
            assert_eq!(video.title, "Search Title");
            assert_eq!(video.channel_title, "Chan");
            assert_eq!(video.view_count, 42);
            assert_eq!(video.duration_seconds, 30);
        }

        #[test]
        fn blank_title_is_unknown() {
            let video = VideoStats::from_resource(&VideoResource {
                id: Some("x".to_string()),
                snippet: Some(VideoSnippet {
                    title: Some("   ".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(video.title, UNKNOWN);
        }

        #[test]
        fn serializes_camel_case() {
            let video = VideoStats::new("v").with_counts(1, 2, 3).with_duration(4);
            let json = serde_json::to_value(&video).unwrap();

            assert_eq!(json["viewCount"], 1);
            assert_eq!(json["likeCount"], 2);
            assert_eq!(json["commentCount"], 3);
            assert_eq!(json["durationSeconds"], 4);
            assert_eq!(json["channelTitle"], UNKNOWN);
        }
    }

    mod channel_stats_tests {
        use super::*;

        #[test]
        fn from_resource_extracts_fields() {
            let json = r#"{"items": [{
                "id": "UCxyz",
                "snippet": {
                    "title": "Channel",
                    "description": "about",
                    "customUrl": "@channel",
                    "publishedAt": "2015-03-01T12:00:00Z",
                    "country": "GB"
                },
                "statistics": { "subscriberCount": "2500", "viewCount": "900000", "videoCount": "120" }
            }]}"#;
            let response = ListResponse::<ChannelResource>::from_json(json).unwrap();
            let channel = ChannelStats::from_resource(&response.items[0]).unwrap();

            assert_eq!(channel.id, "UCxyz");
            assert_eq!(channel.title, "Channel");
            assert_eq!(channel.custom_url, "@channel");
            assert_eq!(channel.country, "GB");
            assert_eq!(channel.subscriber_count, 2500);
            assert_eq!(channel.view_count, 900_000);
            assert_eq!(channel.video_count, 120);
        }

        #[test]
        fn missing_country_is_unknown() {
            let json = r#"{"items": [{ "id": "UCxyz", "snippet": { "title": "Channel" } }]}"#;
            let response = ListResponse::<ChannelResource>::from_json(json).unwrap();
            let channel = ChannelStats::from_resource(&response.items[0]).unwrap();

            assert_eq!(channel.country, UNKNOWN);
            assert_eq!(channel.subscriber_count, 0);
        }
    }

    mod comment_record_tests {
        use super::*;

        #[test]
        fn prefers_original_text() {
            let json = r#"{"items": [{
                "snippet": { "topLevelComment": { "snippet": {
                    "authorDisplayName": "viewer",
                    "textDisplay": "I&#39;m here",
                    "textOriginal": "I'm here",
                    "likeCount": 3,
                    "publishedAt": "2024-05-01T08:00:00Z"
                } } }
            }]}"#;
            let response = ListResponse::<CommentThread>::from_json(json).unwrap();
            let comment = CommentRecord::from_thread(&response.items[0]).unwrap();

            assert_eq!(comment.text, "I'm here");
            assert_eq!(comment.author, "viewer");
            assert_eq!(comment.like_count, 3);
            assert!(comment.published_at.is_some());
        }

        #[test]
        fn falls_back_to_display_text() {
            let json = r#"{"items": [{
                "snippet": { "topLevelComment": { "snippet": { "textDisplay": "hello" } } }
            }]}"#;
            let response = ListResponse::<CommentThread>::from_json(json).unwrap();
            let comment = CommentRecord::from_thread(&response.items[0]).unwrap();

            assert_eq!(comment.text, "hello");
            assert_eq!(comment.like_count, 0);
        }

        #[test]
        fn missing_snippet_yields_empty_comment() {
            let comment = CommentRecord::from_thread(&CommentThread::default()).unwrap();
            assert_eq!(comment.text, "");
            assert_eq!(comment.author, UNKNOWN);
        }
    }
}
