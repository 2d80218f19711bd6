//! Video platform payload types and record normalization for Tubelens.
//!
//! This crate describes what the platform Data API sends (`payload`), how
//! individual field values are parsed (`parse`), and the normalized records
//! the analytics layer works on (`records`). It also holds the closed input
//! enumerations accepted at the HTTP boundary: trending [`Region`] codes and
//! [`ChannelRef`] user input.

pub mod parse;
pub mod payload;
pub mod records;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::parse::RawCount;
pub use self::payload::{
    ChannelResource, CommentThread, ListResponse, SearchResult, VideoResource,
};
pub use self::records::{ChannelStats, CommentRecord, UNKNOWN, VideoStats};

/// Errors raised when a payload value is present but cannot be valid.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid payload JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid count for {field}: {value:?}")]
    InvalidCount { field: &'static str, value: String },

    #[error("invalid ISO-8601 duration: {0:?}")]
    InvalidDuration(String),

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("unknown region code: {0:?}")]
    UnknownRegion(String),

    #[error("invalid channel reference: {0:?}")]
    InvalidChannelRef(String),
}

/// Regions for which trending charts are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    #[default]
    UnitedStates,
    UnitedKingdom,
    Canada,
    Australia,
    India,
    Germany,
    France,
    Spain,
    Italy,
    Netherlands,
    Sweden,
    Japan,
    SouthKorea,
    Brazil,
    Mexico,
    Indonesia,
    Philippines,
    Nigeria,
    SouthAfrica,
}

impl Region {
    pub const ALL: [Region; 19] = [
        Region::UnitedStates,
        Region::UnitedKingdom,
        Region::Canada,
        Region::Australia,
        Region::India,
        Region::Germany,
        Region::France,
        Region::Spain,
        Region::Italy,
        Region::Netherlands,
        Region::Sweden,
        Region::Japan,
        Region::SouthKorea,
        Region::Brazil,
        Region::Mexico,
        Region::Indonesia,
        Region::Philippines,
        Region::Nigeria,
        Region::SouthAfrica,
    ];

    /// ISO 3166-1 alpha-2 code, as the platform expects in `regionCode`.
    pub fn code(self) -> &'static str {
        match self {
            Region::UnitedStates => "US",
            Region::UnitedKingdom => "GB",
            Region::Canada => "CA",
            Region::Australia => "AU",
            Region::India => "IN",
            Region::Germany => "DE",
            Region::France => "FR",
            Region::Spain => "ES",
            Region::Italy => "IT",
            Region::Netherlands => "NL",
            Region::Sweden => "SE",
            Region::Japan => "JP",
            Region::SouthKorea => "KR",
            Region::Brazil => "BR",
            Region::Mexico => "MX",
            Region::Indonesia => "ID",
            Region::Philippines => "PH",
            Region::Nigeria => "NG",
            Region::SouthAfrica => "ZA",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = ParseError;

    /// Case-insensitive; `"uk"` is accepted as an alias for `GB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let code = if code == "UK" { "GB".to_string() } else { code };

        Region::ALL
            .into_iter()
            .find(|region| region.code() == code)
            .ok_or_else(|| ParseError::UnknownRegion(s.to_string()))
    }
}

impl TryFrom<String> for Region {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.code().to_string()
    }
}

/// Length of a canonical channel id (`UC` + 22 characters).
pub const CHANNEL_ID_LEN: usize = 24;

/// How a user referred to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// A canonical channel id, usable directly.
    Id(String),
    /// An `@handle`, stored without the `@`.
    Handle(String),
    /// Free text that has to be resolved by search.
    Name(String),
}

impl ChannelRef {
    /// Classify raw user input.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();

        if let Some(handle) = input.strip_prefix('@') {
            let handle = handle.trim();
            if handle.is_empty() {
                return Err(ParseError::InvalidChannelRef(input.to_string()));
            }
            return Ok(ChannelRef::Handle(handle.to_string()));
        }

        if input.is_empty() {
            return Err(ParseError::InvalidChannelRef(input.to_string()));
        }

        if input.starts_with("UC") && input.len() == CHANNEL_ID_LEN {
            Ok(ChannelRef::Id(input.to_string()))
        } else {
            Ok(ChannelRef::Name(input.to_string()))
        }
    }

    /// Search query to use when the reference is not a direct id.
    pub fn search_query(&self) -> Option<&str> {
        match self {
            ChannelRef::Id(_) => None,
            ChannelRef::Handle(query) | ChannelRef::Name(query) => Some(query.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod region_tests {
        use super::*;

        #[test]
        fn parses_case_insensitively() {
            assert_eq!("us".parse::<Region>().unwrap(), Region::UnitedStates);
            assert_eq!(" Jp ".parse::<Region>().unwrap(), Region::Japan);
        }

        #[test]
        fn accepts_uk_alias() {
            assert_eq!("uk".parse::<Region>().unwrap(), Region::UnitedKingdom);
        }

        #[test]
        fn rejects_unknown_codes() {
            let err = "XX".parse::<Region>().unwrap_err();
            assert!(matches!(err, ParseError::UnknownRegion(code) if code == "XX"));
        }

        #[test]
        fn default_is_united_states() {
            assert_eq!(Region::default().code(), "US");
        }

        #[test]
        fn codes_are_unique_and_round_trip() {
            for region in Region::ALL {
                assert_eq!(region.code().parse::<Region>().unwrap(), region);
            }
        }

        #[test]
        fn serializes_as_code() {
            assert_eq!(
                serde_json::to_value(Region::SouthKorea).unwrap(),
                serde_json::json!("KR")
            );
            let region: Region = serde_json::from_str("\"de\"").unwrap();
            assert_eq!(region, Region::Germany);
        }
    }

    mod channel_ref_tests {
        use super::*;

        #[test]
        fn handle_input() {
            assert_eq!(
                ChannelRef::parse("@veritasium").unwrap(),
                ChannelRef::Handle("veritasium".to_string())
            );
        }

        #[test]
        fn channel_id_input() {
            let id = "UCHnyfMqiRRG1u-2MsSQLbXA";
            assert_eq!(id.len(), CHANNEL_ID_LEN);
            assert_eq!(ChannelRef::parse(id).unwrap(), ChannelRef::Id(id.to_string()));
        }

        #[test]
        fn name_input() {
            let parsed = ChannelRef::parse("  Linus Tech Tips ").unwrap();
            assert_eq!(parsed, ChannelRef::Name("Linus Tech Tips".to_string()));
            assert_eq!(parsed.search_query(), Some("Linus Tech Tips"));
        }

        #[test]
        fn uc_prefix_with_wrong_length_is_a_name() {
            assert_eq!(
                ChannelRef::parse("UCLA").unwrap(),
                ChannelRef::Name("UCLA".to_string())
            );
        }

        #[test]
        fn empty_input_is_rejected() {
            assert!(ChannelRef::parse("").is_err());
            assert!(ChannelRef::parse("   ").is_err());
            assert!(ChannelRef::parse("@").is_err());
        }

        #[test]
        fn id_has_no_search_query() {
            let id = ChannelRef::Id("UCHnyfMqiRRG1u-2MsSQLbXA".to_string());
            assert_eq!(id.search_query(), None);
        }
    }
}
