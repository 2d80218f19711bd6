//! View velocity: how fast a video accumulates views since publication.
//!
//! Every computation takes an explicit `now` so results are reproducible.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tubelens_proto::VideoStats;

use crate::format::serialize_round2;

/// Lower bounds (views/hour) of the velocity tiers.
pub const VIRAL_THRESHOLD: f64 = 10_000.0;
pub const HOT_THRESHOLD: f64 = 5_000.0;
pub const RISING_THRESHOLD: f64 = 1_000.0;

/// Views/hour at which the velocity score saturates at 100.
pub const SCORE_SATURATION: f64 = VIRAL_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VelocityCategory {
    Viral,
    Hot,
    Rising,
    Steady,
}

impl VelocityCategory {
    /// Highest tier first.
    pub const ALL: [VelocityCategory; 4] = [
        VelocityCategory::Viral,
        VelocityCategory::Hot,
        VelocityCategory::Rising,
        VelocityCategory::Steady,
    ];

    /// Thresholds are inclusive lower bounds, checked from the top tier down.
    pub fn from_views_per_hour(views_per_hour: f64) -> Self {
        if views_per_hour >= VIRAL_THRESHOLD {
            VelocityCategory::Viral
        } else if views_per_hour >= HOT_THRESHOLD {
            VelocityCategory::Hot
        } else if views_per_hour >= RISING_THRESHOLD {
            VelocityCategory::Rising
        } else {
            VelocityCategory::Steady
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VelocityCategory::Viral => "Viral (10K+ views/hour)",
            VelocityCategory::Hot => "Hot (5K-10K views/hour)",
            VelocityCategory::Rising => "Rising (1K-5K views/hour)",
            VelocityCategory::Steady => "Steady (<1K views/hour)",
        }
    }
}

/// Hours since publication, floored at one hour.
///
/// An unknown publish time counts as just published.
pub fn hours_since(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let hours = published_at
        .map(|ts| now.signed_duration_since(ts).num_milliseconds() as f64 / 3_600_000.0)
        .unwrap_or(0.0);
    hours.max(1.0)
}

/// Map views/hour onto 0..=100 on a log scale (about 25 points per decade), saturating
/// at [`SCORE_SATURATION`].
pub fn velocity_score(views_per_hour: f64) -> f64 {
    if views_per_hour.is_nan() || views_per_hour <= 0.0 {
        return 0.0;
    }
    let score = (1.0 + views_per_hour).log10() / (1.0 + SCORE_SATURATION).log10() * 100.0;
    score.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityMetrics {
    #[serde(serialize_with = "serialize_round2")]
    pub hours_old: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub views_per_hour: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub views_per_day: f64,
    #[serde(rename = "velocityCategory")]
    pub category: VelocityCategory,
    #[serde(rename = "velocityScore", serialize_with = "serialize_round2")]
    pub score: f64,
}

impl VelocityMetrics {
    pub fn compute(
        view_count: u64,
        published_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let hours_old = hours_since(published_at, now);
        let views_per_hour = view_count as f64 / hours_old;

        Self {
            hours_old,
            views_per_hour,
            views_per_day: views_per_hour * 24.0,
            category: VelocityCategory::from_views_per_hour(views_per_hour),
            score: velocity_score(views_per_hour),
        }
    }

    pub fn for_video(video: &VideoStats, now: DateTime<Utc>) -> Self {
        Self::compute(video.view_count, video.published_at, now)
    }
}

/// Number of videos in one velocity tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityRange {
    pub category: VelocityCategory,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocitySummary {
    #[serde(serialize_with = "serialize_round2")]
    pub average_velocity: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub max_velocity: f64,
    pub velocity_ranges: Vec<VelocityRange>,
}

/// Aggregate velocity over a set of videos. An empty set yields zeros with every tier listed.
pub fn summarize<'a, I>(metrics: I) -> VelocitySummary
where
    I: IntoIterator<Item = &'a VelocityMetrics>,
{
    let mut counts = [0usize; 4];
    let mut total = 0.0;
    let mut max_velocity: f64 = 0.0;
    let mut n = 0usize;

    for m in metrics {
        counts[m.category as usize] += 1;
        total += m.views_per_hour;
        max_velocity = max_velocity.max(m.views_per_hour);
        n += 1;
    }

    VelocitySummary {
        average_velocity: if n == 0 { 0.0 } else { total / n as f64 },
        max_velocity,
        velocity_ranges: VelocityCategory::ALL
            .into_iter()
            .map(|category| VelocityRange {
                category,
                label: category.label(),
                count: counts[category as usize],
            })
            .collect(),
    }
}

/// Pair each video with its velocity, fastest first. Ties keep input order.
pub fn rank_by_velocity(
    videos: &[VideoStats],
    now: DateTime<Utc>,
) -> Vec<(&VideoStats, VelocityMetrics)> {
    let mut ranked: Vec<_> = videos
        .iter()
        .map(|video| (video, VelocityMetrics::for_video(video, now)))
        .collect();
    ranked.sort_by(|a, b| b.1.views_per_hour.total_cmp(&a.1.views_per_hour));
    ranked
}
