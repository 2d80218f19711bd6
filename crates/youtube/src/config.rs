use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::YouTubeError;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the Data API.
#[derive(Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub base_url: Url,
    pub timeout: Duration,
}

impl YouTubeConfig {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, YouTubeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(YouTubeError::Config("API key must not be empty".to_string()));
        }

        // Url::join replaces the last path segment unless the base ends with '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| YouTubeError::Config(format!("Invalid API base URL: {}", e)))?;

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `YOUTUBE_API_KEY`, `YOUTUBE_API_BASE` and `YOUTUBE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, YouTubeError> {
        let api_key = env::var("YOUTUBE_API_KEY")
            .map_err(|_| YouTubeError::Config("YOUTUBE_API_KEY is not set".to_string()))?;
        let base_url =
            env::var("YOUTUBE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let timeout_secs = match env::var("YOUTUBE_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                YouTubeError::Config(format!(
                    "YOUTUBE_TIMEOUT_SECS must be an integer, got {:?}",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self::new(api_key, &base_url)?.with_timeout(Duration::from_secs(timeout_secs)))
    }
}

impl fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_base_url() {
        let config = YouTubeConfig::new("key", "http://localhost:8080/youtube/v3").unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/youtube/v3/");
        assert_eq!(
            config.base_url.join("videos").unwrap().as_str(),
            "http://localhost:8080/youtube/v3/videos"
        );
    }

    #[test]
    fn rejects_empty_key() {
        assert!(matches!(
            YouTubeConfig::new("  ", DEFAULT_API_BASE),
            Err(YouTubeError::Config(_))
        ));
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(matches!(
            YouTubeConfig::new("key", "not a url"),
            Err(YouTubeError::Config(_))
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let config = YouTubeConfig::new("secret-key", DEFAULT_API_BASE).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
