use thiserror::Error;
use tubelens_proto::ParseError;

#[derive(Debug, Error)]
pub enum YouTubeError {
    /// Transport failure. The request URL is stripped since it carries the API key.
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid upstream payload: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl From<reqwest::Error> for YouTubeError {
    fn from(error: reqwest::Error) -> Self {
        YouTubeError::Http(error.without_url())
    }
}

impl YouTubeError {
    /// True for failures of the upstream service itself (transport or non-success status).
    pub fn is_upstream(&self) -> bool {
        matches!(self, YouTubeError::Http(_) | YouTubeError::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_failures() {
        let status = YouTubeError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(status.is_upstream());
        assert!(!YouTubeError::NotFound("Video x".to_string()).is_upstream());
        assert!(!YouTubeError::Config("bad".to_string()).is_upstream());
    }
}
