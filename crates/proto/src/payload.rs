//! Raw response shapes of the video platform Data API.
//!
//! Every field is optional: the platform omits statistics it does not expose
//! (hidden like counts, disabled comments) and partial `part=` selections drop
//! whole sections. Normalization into records happens in [`crate::records`].

use serde::Deserialize;

use crate::ParseError;
use crate::parse::{RawCount, null_as_default};

/// Envelope shared by every list endpoint (`videos`, `search`, `channels`, `commentThreads`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

impl<T> ListResponse<T>
where
    T: for<'de> Deserialize<'de>,
{
    /// Parse a list response from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_page_token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    /// Preferred thumbnail URL: medium, then high, then default.
    pub fn best_url(&self) -> Option<&str> {
        [&self.medium, &self.high, &self.default]
            .into_iter()
            .flatten()
            .find_map(|t| t.url.as_deref())
    }
}

/// `snippet` section of a video or search result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub published_at: Option<String>,
    pub channel_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel_title: Option<String>,
    pub thumbnails: Option<Thumbnails>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<RawCount>,
    pub like_count: Option<RawCount>,
    pub comment_count: Option<RawCount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
    pub duration: Option<String>,
}

/// Item of a `videos` list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    pub id: Option<String>,
    pub snippet: Option<VideoSnippet>,
    pub statistics: Option<VideoStatistics>,
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    pub kind: Option<String>,
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

/// Item of a `search` list. Carries no statistics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    pub id: Option<SearchResultId>,
    pub snippet: Option<VideoSnippet>,
}

impl SearchResult {
    pub fn video_id(&self) -> Option<&str> {
        self.id.as_ref().and_then(|id| id.video_id.as_deref())
    }

    /// Channel id of a channel-type result, falling back to the snippet's channel.
    pub fn channel_id(&self) -> Option<&str> {
        self.id
            .as_ref()
            .and_then(|id| id.channel_id.as_deref())
            .or_else(|| self.snippet.as_ref()?.channel_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub custom_url: Option<String>,
    pub published_at: Option<String>,
    pub country: Option<String>,
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub subscriber_count: Option<RawCount>,
    pub view_count: Option<RawCount>,
    pub video_count: Option<RawCount>,
    pub hidden_subscriber_count: Option<bool>,
}

/// Item of a `channels` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelResource {
    pub id: Option<String>,
    pub snippet: Option<ChannelSnippet>,
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub author_display_name: Option<String>,
    pub text_display: Option<String>,
    pub text_original: Option<String>,
    pub like_count: Option<RawCount>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comment {
    pub id: Option<String>,
    pub snippet: Option<CommentSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: Option<Comment>,
    pub total_reply_count: Option<RawCount>,
}

/// Item of a `commentThreads` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentThread {
    pub id: Option<String>,
    pub snippet: Option<CommentThreadSnippet>,
}

impl CommentThread {
    /// Snippet of the top-level comment, if present.
    pub fn comment_snippet(&self) -> Option<&CommentSnippet> {
        self.snippet
            .as_ref()?
            .top_level_comment
            .as_ref()?
            .snippet
            .as_ref()
    }
}
