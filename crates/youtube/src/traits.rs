//! Trait seam over the platform client.
//!
//! Handlers depend on [`PlatformSource`] rather than [`YouTubeClient`] so they
//! can be exercised against an in-memory source in tests.

use std::future::Future;

use tubelens_proto::{ChannelRef, ChannelStats, CommentRecord, Region, VideoStats};

use crate::client::YouTubeClient;
use crate::error::YouTubeError;

/// Read-only lookups against a video platform.
pub trait PlatformSource: Send + Sync {
    /// Whether credentials are present.
    fn is_configured(&self) -> bool;

    /// Resolve user input to a channel id.
    fn resolve_channel(
        &self,
        reference: &ChannelRef,
    ) -> impl Future<Output = Result<String, YouTubeError>> + Send;

    fn get_channel(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = Result<ChannelStats, YouTubeError>> + Send;

    /// Latest uploads, newest first, with statistics.
    fn get_recent_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<VideoStats>, YouTubeError>> + Send;

    /// Uploads ordered by relevance; counts may be absent.
    fn get_channel_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<VideoStats>, YouTubeError>> + Send;

    fn get_video(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<VideoStats, YouTubeError>> + Send;

    fn get_comments(
        &self,
        video_id: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<CommentRecord>, YouTubeError>> + Send;

    fn get_trending(
        &self,
        region: Region,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<VideoStats>, YouTubeError>> + Send;
}

impl PlatformSource for YouTubeClient {
    fn is_configured(&self) -> bool {
        self.is_configured()
    }

    async fn resolve_channel(&self, reference: &ChannelRef) -> Result<String, YouTubeError> {
        self.resolve_channel(reference).await
    }

    async fn get_channel(&self, channel_id: &str) -> Result<ChannelStats, YouTubeError> {
        self.get_channel(channel_id).await
    }

    async fn get_recent_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<VideoStats>, YouTubeError> {
        self.get_recent_videos(channel_id, limit).await
    }

    async fn get_channel_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<VideoStats>, YouTubeError> {
        self.get_channel_videos(channel_id, limit).await
    }

    async fn get_video(&self, video_id: &str) -> Result<VideoStats, YouTubeError> {
        self.get_video(video_id).await
    }

    async fn get_comments(
        &self,
        video_id: &str,
        limit: u32,
    ) -> Result<Vec<CommentRecord>, YouTubeError> {
        self.get_comments(video_id, limit).await
    }

    async fn get_trending(
        &self,
        region: Region,
        limit: u32,
    ) -> Result<Vec<VideoStats>, YouTubeError> {
        self.get_trending(region, limit).await
    }
}
