use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Where a review came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    /// Authored in dscvr and kept in the review store.
    FirstParty,
    /// Fetched from the places provider per request; never stored.
    Vendor,
}

impl ReviewSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewSource::FirstParty => "first_party",
            ReviewSource::Vendor => "vendor",
        }
    }
}

impl fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_party" => Ok(ReviewSource::FirstParty),
            "vendor" => Ok(ReviewSource::Vendor),
            other => Err(CoreError::InvalidReviewSource(other.to_owned())),
        }
    }
}

/// A single review of a place, from either source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub place_id: String,
    pub author_name: String,
    /// Integer star rating, 1–5. Range is enforced by the review store.
    pub rating: u8,
    pub body: String,
    /// Exact creation time. Always set for first-party reviews; vendor
    /// reviews may only carry [`Review::relative_time`].
    pub created_at: Option<DateTime<Utc>>,
    /// Provider-supplied age such as `"2 weeks ago"`.
    #[serde(default)]
    pub relative_time: Option<String>,
    pub source: ReviewSource,
    #[serde(default)]
    pub media: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_source_round_trips_through_str() {
        for source in [ReviewSource::FirstParty, ReviewSource::Vendor] {
            assert_eq!(source.as_str().parse::<ReviewSource>().unwrap(), source);
        }
    }

    #[test]
    fn review_source_rejects_unknown() {
        let err = "google".parse::<ReviewSource>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidReviewSource(ref s) if s == "google"));
    }

    #[test]
    fn review_serializes_source_tag() {
        let review = Review {
            id: "r1".to_owned(),
            place_id: "p1".to_owned(),
            author_name: "Ana".to_owned(),
            rating: 4,
            body: "Great patio.".to_owned(),
            created_at: None,
            relative_time: Some("2 weeks ago".to_owned()),
            source: ReviewSource::Vendor,
            media: vec![],
        };
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["source"], "vendor");
        assert!(json["created_at"].is_null());
    }
}
