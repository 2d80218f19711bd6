//! Video platform Data API client for Tubelens.
//!
//! Fetches channels, videos, comment threads and trending charts over HTTP and
//! normalizes them into `tubelens-proto` records.

mod client;
mod config;
mod error;
mod traits;

pub use self::client::{MAX_RESULTS, YouTubeClient};
pub use self::config::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, YouTubeConfig};
pub use self::error::YouTubeError;
pub use self::traits::PlatformSource;
