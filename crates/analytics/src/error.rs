use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("invalid lexicon: {0}")]
    InvalidLexicon(#[from] serde_json::Error),

    #[error("invalid weight {weight} for {phrase:?}: must be finite and non-zero")]
    InvalidWeight { phrase: String, weight: f64 },

    #[error("lexicon entry {0:?} contains no words")]
    EmptyPhrase(String),

    #[error("failed to read lexicon {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
