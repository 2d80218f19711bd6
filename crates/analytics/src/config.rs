//! Analytics configuration.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_TOP_WORDS_LIMIT: usize = 10;
pub const DEFAULT_MIN_WORD_LEN: usize = 4;
pub const DEFAULT_COMMENT_SAMPLE_SIZE: usize = 20;
pub const DEFAULT_COMMENT_EXCERPT_LEN: usize = 100;
pub const DEFAULT_TRENDING_LIMIT: usize = 30;
pub const DEFAULT_RELATED_LIMIT: usize = 3;
pub const DEFAULT_TREND_DAYS: usize = 8;
pub const DEFAULT_CHANNEL_DESCRIPTION_LEN: usize = 200;
pub const DEFAULT_VIDEO_DESCRIPTION_LEN: usize = 300;

/// Settings for comment classification and word frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentConfig {
    /// Number of entries kept in the top-words table.
    pub top_words_limit: usize,
    /// Words shorter than this (in characters) are not counted.
    pub min_word_len: usize,
    /// Number of classified comments echoed back in the response.
    pub sample_size: usize,
    /// Sampled comment text is truncated to this many characters.
    pub excerpt_len: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            top_words_limit: DEFAULT_TOP_WORDS_LIMIT,
            min_word_len: DEFAULT_MIN_WORD_LEN,
            sample_size: DEFAULT_COMMENT_SAMPLE_SIZE,
            excerpt_len: DEFAULT_COMMENT_EXCERPT_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Maximum number of videos returned in a trending response.
    pub trending_limit: usize,
    /// Maximum number of related videos returned for a video.
    pub related_limit: usize,
    /// Number of daily buckets in a channel's trend series.
    pub trend_days: usize,
    pub channel_description_len: usize,
    pub video_description_len: usize,
    /// JSON lexicon (`{"word": weight}`) replacing the built-in one.
    pub lexicon_path: Option<PathBuf>,
    pub sentiment: SentimentConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            trending_limit: DEFAULT_TRENDING_LIMIT,
            related_limit: DEFAULT_RELATED_LIMIT,
            trend_days: DEFAULT_TREND_DAYS,
            channel_description_len: DEFAULT_CHANNEL_DESCRIPTION_LEN,
            video_description_len: DEFAULT_VIDEO_DESCRIPTION_LEN,
            lexicon_path: None,
            sentiment: SentimentConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Load overrides from `SENTIMENT_LEXICON_PATH`, `TOP_WORDS_LIMIT` and `TRENDING_LIMIT`.
    ///
    /// Unparseable numbers fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.lexicon_path = env::var("SENTIMENT_LEXICON_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        if let Some(limit) = env_usize("TOP_WORDS_LIMIT") {
            config.sentiment.top_words_limit = limit;
        }
        if let Some(limit) = env_usize("TRENDING_LIMIT") {
            config.trending_limit = limit;
        }

        config
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.trending_limit, 30);
        assert_eq!(config.related_limit, 3);
        assert_eq!(config.trend_days, 8);
        assert!(config.lexicon_path.is_none());
        assert_eq!(config.sentiment.top_words_limit, 10);
        assert_eq!(config.sentiment.min_word_len, 4);
        assert_eq!(config.sentiment.sample_size, 20);
        assert_eq!(config.sentiment.excerpt_len, 100);
    }
}
