//! Engagement rates derived from view, like and comment counts.
//!
//! All rates are percentages of views. A video with zero views has every rate
//! defined as 0.

use serde::Serialize;
use tubelens_proto::VideoStats;

use crate::format::serialize_round2;

/// `numerator / view_count * 100`, or 0 when there are no views.
pub fn rate(numerator: u64, view_count: u64) -> f64 {
    if view_count == 0 {
        return 0.0;
    }
    numerator as f64 / view_count as f64 * 100.0
}

/// `(likes + comments) / views * 100`.
pub fn engagement_rate(view_count: u64, like_count: u64, comment_count: u64) -> f64 {
    rate(like_count.saturating_add(comment_count), view_count)
}

/// Per-video engagement rates. Values are exact; serialization rounds to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    #[serde(serialize_with = "serialize_round2")]
    pub engagement_rate: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub like_rate: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub comment_rate: f64,
}

impl EngagementMetrics {
    pub fn compute(view_count: u64, like_count: u64, comment_count: u64) -> Self {
        Self {
            engagement_rate: engagement_rate(view_count, like_count, comment_count),
            like_rate: rate(like_count, view_count),
            comment_rate: rate(comment_count, view_count),
        }
    }

    pub fn for_video(video: &VideoStats) -> Self {
        Self::compute(video.view_count, video.like_count, video.comment_count)
    }

    pub fn tier(&self) -> EngagementTier {
        EngagementTier::from_rate(self.engagement_rate)
    }
}

/// Mean of per-video engagement rates, or 0 for an empty set.
pub fn average_engagement_rate(videos: &[VideoStats]) -> f64 {
    if videos.is_empty() {
        return 0.0;
    }
    let total: f64 = videos
        .iter()
        .map(|v| engagement_rate(v.view_count, v.like_count, v.comment_count))
        .sum();
    total / videos.len() as f64
}

/// Coarse engagement bands used for distribution charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EngagementTier {
    Low,
    Medium,
    High,
}

impl EngagementTier {
    pub const ALL: [EngagementTier; 3] = [
        EngagementTier::Low,
        EngagementTier::Medium,
        EngagementTier::High,
    ];

    /// Below 2% is low, below 5% is medium, anything else is high.
    pub fn from_rate(engagement_rate: f64) -> Self {
        if engagement_rate < 2.0 {
            EngagementTier::Low
        } else if engagement_rate < 5.0 {
            EngagementTier::Medium
        } else {
            EngagementTier::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EngagementTier::Low => "Low (0-2%)",
            EngagementTier::Medium => "Medium (2-5%)",
            EngagementTier::High => "High (5%+)",
        }
    }
}

/// Number of videos falling in one engagement tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRange {
    pub range: &'static str,
    pub tier: EngagementTier,
    pub count: usize,
}

/// Count videos per engagement tier. Every tier is present, in `ALL` order.
pub fn engagement_distribution(videos: &[VideoStats]) -> Vec<EngagementRange> {
    let mut counts = [0usize; 3];
    for video in videos {
        let tier = EngagementMetrics::for_video(video).tier();
        counts[tier as usize] += 1;
    }

    EngagementTier::ALL
        .into_iter()
        .map(|tier| EngagementRange {
            range: tier.label(),
            tier,
            count: counts[tier as usize],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_views_yield_zero_rates() {
        let metrics = EngagementMetrics::compute(0, 10, 5);
        assert_eq!(metrics, EngagementMetrics::default());
    }

    #[test]
    fn engagement_rate_is_exact() {
        let metrics = EngagementMetrics::compute(1_000, 40, 10);
        assert_eq!(metrics.engagement_rate, 5.0);
        assert_eq!(metrics.like_rate, 4.0);
        assert_eq!(metrics.comment_rate, 1.0);
    }

    #[test]
    fn engagement_rate_matches_formula() {
        for (views, likes, comments) in [(3, 1, 0), (7, 2, 3), (123_456, 789, 12), (1, 0, 0)] {
            let expected = (likes + comments) as f64 / views as f64 * 100.0;
            assert_eq!(engagement_rate(views, likes, comments), expected);
        }
    }

    #[test]
    fn serialization_rounds_to_two_decimals() {
        let metrics = EngagementMetrics::compute(3, 1, 0);
        let json = serde_json::to_value(metrics).unwrap();

        assert_eq!(json["engagementRate"], 33.33);
        assert_eq!(json["likeRate"], 33.33);
        assert_eq!(json["commentRate"], 0.0);
    }

    #[test]
    fn computing_twice_is_identical() {
        let video = VideoStats::new("v").with_counts(900, 33, 4);
        assert_eq!(EngagementMetrics::for_video(&video), EngagementMetrics::for_video(&video));
    }

    #[test]
    fn average_of_empty_set_is_zero() {
        assert_eq!(average_engagement_rate(&[]), 0.0);
    }

    #[test]
    fn average_uses_per_video_rates() {
        let videos = vec![
            VideoStats::new("a").with_counts(100, 10, 0),
            VideoStats::new("b").with_counts(1_000, 10, 0),
            VideoStats::new("c").with_counts(0, 5, 5),
        ];
        // 10% + 1% + 0% over three videos
        assert!((average_engagement_rate(&videos) - 11.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(EngagementTier::from_rate(0.0), EngagementTier::Low);
        assert_eq!(EngagementTier::from_rate(1.99), EngagementTier::Low);
        assert_eq!(EngagementTier::from_rate(2.0), EngagementTier::Medium);
        assert_eq!(EngagementTier::from_rate(4.99), EngagementTier::Medium);
        assert_eq!(EngagementTier::from_rate(5.0), EngagementTier::High);
    }

    #[test]
    fn distribution_lists_every_tier() {
        let videos = vec![
            VideoStats::new("low").with_counts(1_000, 10, 0),
            VideoStats::new("mid").with_counts(1_000, 30, 0),
            VideoStats::new("high").with_counts(1_000, 60, 0),
            VideoStats::new("high2").with_counts(10, 1, 0),
        ];
        let distribution = engagement_distribution(&videos);

        let counts: Vec<_> = distribution.iter().map(|r| (r.range, r.count)).collect();
        assert_eq!(
            counts,
            vec![("Low (0-2%)", 1), ("Medium (2-5%)", 1), ("High (5%+)", 2)]
        );
    }

    #[test]
    fn distribution_of_empty_set_is_all_zero() {
        let distribution = engagement_distribution(&[]);
        assert_eq!(distribution.len(), 3);
        assert!(distribution.iter().all(|r| r.count == 0));
    }
}
