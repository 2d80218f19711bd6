//! Duration buckets and per-channel content summaries.

use serde::Serialize;
use tubelens_proto::VideoStats;

use crate::engagement::average_engagement_rate;
use crate::format::serialize_round2;

/// Videos shorter than this are short-form.
pub const SHORT_MAX_SECONDS: u64 = 300;
/// Videos at least this long are long-form.
pub const LONG_MIN_SECONDS: u64 = 1_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 3] = [
        DurationBucket::Short,
        DurationBucket::Medium,
        DurationBucket::Long,
    ];

    /// `< 300s` short, `300..1200s` medium, `>= 1200s` long.
    pub fn from_seconds(duration_seconds: u64) -> Self {
        if duration_seconds < SHORT_MAX_SECONDS {
            DurationBucket::Short
        } else if duration_seconds < LONG_MIN_SECONDS {
            DurationBucket::Medium
        } else {
            DurationBucket::Long
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationBucket::Short => "Short",
            DurationBucket::Medium => "Medium",
            DurationBucket::Long => "Long",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContentDistribution {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl ContentDistribution {
    pub fn from_videos(videos: &[VideoStats]) -> Self {
        let mut distribution = Self::default();
        for video in videos {
            distribution.record(DurationBucket::from_seconds(video.duration_seconds));
        }
        distribution
    }

    pub fn record(&mut self, bucket: DurationBucket) {
        match bucket {
            DurationBucket::Short => self.short += 1,
            DurationBucket::Medium => self.medium += 1,
            DurationBucket::Long => self.long += 1,
        }
    }

    pub fn count(&self, bucket: DurationBucket) -> usize {
        match bucket {
            DurationBucket::Short => self.short,
            DurationBucket::Medium => self.medium,
            DurationBucket::Long => self.long,
        }
    }

    pub fn total(&self) -> usize {
        self.short + self.medium + self.long
    }
}

/// The video with the most views. On ties the earliest in input order wins.
pub fn top_performer(videos: &[VideoStats]) -> Option<&VideoStats> {
    videos
        .iter()
        .reduce(|best, video| if video.view_count > best.view_count { video } else { best })
}

/// Mean view count, rounded to the nearest integer. Empty input yields 0.
pub fn average_views(videos: &[VideoStats]) -> u64 {
    if videos.is_empty() {
        return 0;
    }
    let total: u128 = videos.iter().map(|v| u128::from(v.view_count)).sum();
    (total as f64 / videos.len() as f64).round() as u64
}

/// Content summary for a set of channel videos.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    #[serde(serialize_with = "serialize_round2")]
    pub avg_engagement_rate: f64,
    pub avg_views_per_video: u64,
    pub content_distribution: ContentDistribution,
    pub top_performing_video: Option<VideoStats>,
}

pub fn analyze_content(videos: &[VideoStats]) -> ContentSummary {
    ContentSummary {
        avg_engagement_rate: average_engagement_rate(videos),
        avg_views_per_video: average_views(videos),
        content_distribution: ContentDistribution::from_videos(videos),
        top_performing_video: top_performer(videos).cloned(),
    }
}
