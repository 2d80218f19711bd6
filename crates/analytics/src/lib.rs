//! Analytics derivation for Tubelens.
//!
//! Every calculator here is synchronous and pure: it reads already-fetched
//! records and an explicit `now`, and returns new values. Network access,
//! caching and HTTP concerns live in the `youtube` and `api` crates.
//!
//! - [`engagement`]: like/comment ratios and engagement tiers
//! - [`velocity`]: views per hour, velocity category and score
//! - [`content`]: duration buckets and content summaries
//! - [`sentiment`]: lexicon-based comment classification and top words
//! - [`aggregate`]: channel, video and trending response composition

pub mod aggregate;
pub mod config;
pub mod content;
pub mod engagement;
pub mod error;
pub mod format;
pub mod sentiment;
pub mod velocity;

pub use aggregate::{Analyzer, ChannelAnalytics, TrendingAnalytics, VideoAnalytics};
pub use config::{AnalyticsConfig, SentimentConfig};
pub use content::{ContentDistribution, ContentSummary, DurationBucket};
pub use engagement::{EngagementMetrics, EngagementTier};
pub use error::AnalyticsError;
pub use sentiment::{Sentiment, SentimentClassifier, SentimentLexicon};
pub use velocity::{VelocityCategory, VelocityMetrics, VelocitySummary};
