use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Whether a venue is open right now, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenState {
    Open,
    Closed,
    #[default]
    Unknown,
}

impl From<Option<bool>> for OpenState {
    fn from(open_now: Option<bool>) -> Self {
        match open_now {
            Some(true) => OpenState::Open,
            Some(false) => OpenState::Closed,
            None => OpenState::Unknown,
        }
    }
}

/// A normalized place ready for ranking and display.
///
/// Built fresh for every search and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Provider place identifier.
    pub id: String,
    pub name: String,
    /// Human-readable label from the first category tag (e.g. `"Night Club"`).
    pub category: String,
    /// Provider rating in `[0.0, 5.0]`; `0.0` when the provider has none.
    pub rating: f64,
    pub review_count: u32,
    /// Distance from the search origin, computed locally.
    pub distance_meters: f64,
    /// `"$"` repeated once per price level; empty when unknown.
    pub price_label: String,
    pub open_state: OpenState,
    pub tags: Vec<String>,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub photo_refs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_state_from_open_now() {
        assert_eq!(OpenState::from(Some(true)), OpenState::Open);
        assert_eq!(OpenState::from(Some(false)), OpenState::Closed);
        assert_eq!(OpenState::from(None), OpenState::Unknown);
    }

    #[test]
    fn open_state_serializes_snake_case() {
        let json = serde_json::to_string(&OpenState::Unknown).unwrap();
        assert_eq!(json, "\"unknown\"");
    }
}
