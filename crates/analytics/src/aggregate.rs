//! Composition of the calculators into channel, video and trending responses.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tubelens_proto::{ChannelStats, CommentRecord, Region, VideoStats};

use crate::config::AnalyticsConfig;
use crate::content::{ContentSummary, DurationBucket, analyze_content};
use crate::engagement::{
    EngagementMetrics, EngagementRange, average_engagement_rate, engagement_distribution,
};
use crate::error::AnalyticsError;
use crate::format::{
    format_duration, format_number, format_relative_time, serialize_round2, truncate_with_ellipsis,
};
use crate::sentiment::{CommentsAnalysis, SentimentClassifier, SentimentLexicon};
use crate::velocity::{self, VelocityMetrics, VelocitySummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    #[serde(flatten)]
    pub stats: ChannelStats,
    pub subscriber_count_formatted: String,
    pub view_count_formatted: String,
    pub video_count_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentVideo {
    #[serde(flatten)]
    pub stats: VideoStats,
    #[serde(flatten)]
    pub engagement: EngagementMetrics,
    pub view_count_formatted: String,
    pub duration_formatted: String,
    pub duration_bucket: DurationBucket,
    pub published_ago: Option<String>,
}

/// Views of the videos published on one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAnalytics {
    pub channel: ChannelSummary,
    pub recent_videos: Vec<RecentVideo>,
    pub trend_data: Vec<TrendPoint>,
    pub enhanced_analytics: ContentSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    #[serde(flatten)]
    pub stats: VideoStats,
    pub view_count_formatted: String,
    pub like_count_formatted: String,
    pub comment_count_formatted: String,
    pub duration_formatted: String,
    pub published_ago: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetrics {
    #[serde(flatten)]
    pub engagement: EngagementMetrics,
    #[serde(flatten)]
    pub velocity: VelocityMetrics,
    pub duration_bucket: DurationBucket,
    /// Sibling uploads per day.
    #[serde(serialize_with = "serialize_round2")]
    pub upload_frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedVideo {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalytics {
    pub video: VideoSummary,
    pub analytics: VideoMetrics,
    pub related_videos: Vec<RelatedVideo>,
    pub comments_analysis: CommentsAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingVideo {
    #[serde(flatten)]
    pub stats: VideoStats,
    #[serde(flatten)]
    pub engagement: EngagementMetrics,
    #[serde(flatten)]
    pub velocity: VelocityMetrics,
    pub view_count_formatted: String,
    pub duration_formatted: String,
    pub published_ago: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingSummary {
    pub total_videos: usize,
    pub total_views: u64,
    pub average_views: u64,
    pub top_performer: Option<TrendingVideo>,
    #[serde(serialize_with = "serialize_round2")]
    pub avg_engagement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: DurationBucket,
    pub count: usize,
    pub avg_views: u64,
    #[serde(serialize_with = "serialize_round2")]
    pub avg_engagement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingAnalytics {
    pub trending_videos: Vec<TrendingVideo>,
    pub region: Region,
    pub summary: TrendingSummary,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub engagement_distribution: Vec<EngagementRange>,
    pub velocity_summary: VelocitySummary,
}

/// Builds analytics responses from already-fetched records.
///
/// Holds only read-only configuration and the sentiment lexicon, so one
/// instance can be shared across requests.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyticsConfig,
    classifier: SentimentClassifier,
}

impl Analyzer {
    pub fn new(config: AnalyticsConfig, lexicon: SentimentLexicon) -> Self {
        let classifier = SentimentClassifier::new(lexicon, config.sentiment.clone());
        Self { config, classifier }
    }

    /// Build an analyzer, loading the lexicon from `config.lexicon_path` when set.
    pub fn from_config(config: AnalyticsConfig) -> Result<Self, AnalyticsError> {
        let lexicon = match &config.lexicon_path {
            Some(path) => {
                let lexicon = SentimentLexicon::from_path(path)?;
                tracing::info!(
                    path = %path.display(),
                    entries = lexicon.len(),
                    "Loaded sentiment lexicon"
                );
                lexicon
            }
            None => SentimentLexicon::default(),
        };
        Ok(Self::new(config, lexicon))
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    pub fn channel_analytics(
        &self,
        channel: &ChannelStats,
        videos: &[VideoStats],
        now: DateTime<Utc>,
    ) -> ChannelAnalytics {
        let mut stats = channel.clone();
        stats.description =
            truncate_with_ellipsis(&stats.description, self.config.channel_description_len);

        let summary = ChannelSummary {
            subscriber_count_formatted: format_number(stats.subscriber_count),
            view_count_formatted: format_number(stats.view_count),
            video_count_formatted: format_number(stats.video_count),
            stats,
        };

        let recent_videos = videos
            .iter()
            .map(|video| RecentVideo {
                stats: video.clone(),
                engagement: EngagementMetrics::for_video(video),
                view_count_formatted: format_number(video.view_count),
                duration_formatted: format_duration(video.duration_seconds),
                duration_bucket: DurationBucket::from_seconds(video.duration_seconds),
                published_ago: video.published_at.map(|ts| format_relative_time(ts, now)),
            })
            .collect();

        tracing::debug!(channel_id = %channel.id, videos = videos.len(), "Built channel analytics");

        ChannelAnalytics {
            channel: summary,
            recent_videos,
            trend_data: trend_data(videos, now, self.config.trend_days),
            enhanced_analytics: analyze_content(videos),
        }
    }

    /// `siblings` are other uploads of the same channel; `video` itself is skipped if present.
    pub fn video_analytics(
        &self,
        video: &VideoStats,
        comments: &[CommentRecord],
        siblings: &[VideoStats],
        now: DateTime<Utc>,
    ) -> VideoAnalytics {
        let mut stats = video.clone();
        stats.description =
            truncate_with_ellipsis(&stats.description, self.config.video_description_len);

        let summary = VideoSummary {
            view_count_formatted: format_number(stats.view_count),
            like_count_formatted: format_number(stats.like_count),
            comment_count_formatted: format_number(stats.comment_count),
            duration_formatted: format_duration(stats.duration_seconds),
            published_ago: stats.published_at.map(|ts| format_relative_time(ts, now)),
            stats,
        };

        let analytics = VideoMetrics {
            engagement: EngagementMetrics::for_video(video),
            velocity: VelocityMetrics::for_video(video, now),
            duration_bucket: DurationBucket::from_seconds(video.duration_seconds),
            upload_frequency: upload_frequency(siblings),
        };

        let related_videos = siblings
            .iter()
            .filter(|sibling| sibling.id != video.id)
            .take(self.config.related_limit)
            .map(|sibling| RelatedVideo {
                id: sibling.id.clone(),
                title: sibling.title.clone(),
                thumbnail_url: sibling.thumbnail_url.clone(),
            })
            .collect();

        tracing::debug!(
            video_id = %video.id,
            comments = comments.len(),
            siblings = siblings.len(),
            "Built video analytics"
        );

        VideoAnalytics {
            video: summary,
            analytics,
            related_videos,
            comments_analysis: self.classifier.analyze_comments(comments),
        }
    }

    /// Summaries cover every input video; only `trending_videos` is truncated.
    pub fn trending_analytics(
        &self,
        region: Region,
        videos: &[VideoStats],
        now: DateTime<Utc>,
    ) -> TrendingAnalytics {
        let ranked = velocity::rank_by_velocity(videos, now);
        let velocity_summary = velocity::summarize(ranked.iter().map(|(_, m)| m));

        let annotated: Vec<TrendingVideo> = ranked
            .into_iter()
            .map(|(video, velocity)| TrendingVideo {
                stats: video.clone(),
                engagement: EngagementMetrics::for_video(video),
                velocity,
                view_count_formatted: format_number(video.view_count),
                duration_formatted: format_duration(video.duration_seconds),
                published_ago: video.published_at.map(|ts| format_relative_time(ts, now)),
            })
            .collect();

        let total_views: u64 = videos.iter().map(|v| v.view_count).fold(0, u64::saturating_add);
        let summary = TrendingSummary {
            total_videos: videos.len(),
            total_views,
            average_views: total_views.checked_div(videos.len() as u64).unwrap_or(0),
            top_performer: annotated.first().cloned(),
            avg_engagement: average_engagement_rate(videos),
        };

        tracing::debug!(region = %region, videos = videos.len(), "Built trending analytics");

        TrendingAnalytics {
            trending_videos: annotated.into_iter().take(self.config.trending_limit).collect(),
            region,
            summary,
            category_breakdown: category_breakdown(videos),
            engagement_distribution: engagement_distribution(videos),
            velocity_summary,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default(), SentimentLexicon::default())
    }
}

/// Daily view totals for the last `days` UTC days, oldest first.
///
/// Each video contributes its view count to the day it was published; videos
/// published outside the window or without a publish time are ignored.
pub fn trend_data(videos: &[VideoStats], now: DateTime<Utc>, days: usize) -> Vec<TrendPoint> {
    let today = now.date_naive();

    (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset as i64);
            let views = videos
                .iter()
                .filter(|v| v.published_at.is_some_and(|ts| ts.date_naive() == date))
                .map(|v| v.view_count)
                .fold(0, u64::saturating_add);
            TrendPoint { date, views }
        })
        .collect()
}

/// Uploads per day across the span of `videos` publish dates.
///
/// Zero for fewer than two dated videos or a span under one whole day.
pub fn upload_frequency(videos: &[VideoStats]) -> f64 {
    let mut dates = videos.iter().filter_map(|v| v.published_at);
    let Some(first) = dates.next() else {
        return 0.0;
    };
    let (oldest, newest) = dates.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));

    let days = (newest - oldest).num_days();
    if videos.len() < 2 || days <= 0 {
        return 0.0;
    }
    videos.len() as f64 / days as f64
}

/// Group videos by duration bucket. Empty buckets are omitted.
pub fn category_breakdown(videos: &[VideoStats]) -> Vec<CategoryBreakdown> {
    DurationBucket::ALL
        .into_iter()
        .filter_map(|bucket| {
            let group: Vec<VideoStats> = videos
                .iter()
                .filter(|v| DurationBucket::from_seconds(v.duration_seconds) == bucket)
                .cloned()
                .collect();
            if group.is_empty() {
                return None;
            }

            let total: u64 = group.iter().map(|v| v.view_count).fold(0, u64::saturating_add);
            Some(CategoryBreakdown {
                category: bucket,
                count: group.len(),
                avg_views: total / group.len() as u64,
                avg_engagement: average_engagement_rate(&group),
            })
        })
        .collect()
}
