//! Google Places (legacy web service) response types.
//!
//! ## Observed shape
//!
//! ### Envelope
//! Every response carries a string `status`. `OK` and `ZERO_RESULTS` are
//! successes; `OVER_QUERY_LIMIT`, `REQUEST_DENIED`, `INVALID_REQUEST` and
//! `UNKNOWN_ERROR` arrive with HTTP 200 and an optional `error_message`.
//!
//! ### Results
//! `results` is kept as raw JSON and each element is deserialized on its own,
//! so one odd record (a string where a number belongs, say) is dropped instead
//! of failing the whole page. Every field on [`RawPlace`] is optional; the
//! normalizer decides what is required.
//!
//! ### `types`
//! Snake-case category tags, most specific first, e.g.
//! `["night_club", "bar", "point_of_interest", "establishment"]`.
//!
//! ### Reviews
//! Only the details endpoint returns reviews, at most five. `time` is unix
//! seconds and is occasionally missing from cached responses, in which case
//! `relative_time_description` (`"2 weeks ago"`) is the only age signal.

use dscvr_core::Coordinate;
use serde::Deserialize;

/// Search parameters sent to the nearby-search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub location: Coordinate,
    pub radius_meters: u32,
    /// Provider category types such as `"restaurant"` or `"night_club"`.
    pub category_types: Vec<String>,
    pub keyword: Option<String>,
}

/// Envelope of `GET nearbysearch/json`.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub error_message: Option<String>,

    /// Raw result objects, parsed one by one into [`RawPlace`].
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// A single place as returned by nearby search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub place_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Average rating, `0.0`–`5.0`. Absent for places with no ratings.
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub user_ratings_total: Option<u32>,

    /// `0` (free) through `4` (very expensive).
    #[serde(default)]
    pub price_level: Option<u8>,

    #[serde(default)]
    pub geometry: Option<RawGeometry>,

    /// `null` has been seen in the wild, hence `Option` rather than a
    /// defaulted `Vec`.
    #[serde(default)]
    pub types: Option<Vec<String>>,

    #[serde(default)]
    pub opening_hours: Option<RawOpeningHours>,

    #[serde(default)]
    pub photos: Option<Vec<RawPhoto>>,

    /// Short address, e.g. `"123 King St, Charleston"`.
    #[serde(default)]
    pub vicinity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeometry {
    #[serde(default)]
    pub location: Option<RawLatLng>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLatLng {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPhoto {
    #[serde(default)]
    pub photo_reference: Option<String>,
}

/// Envelope of `GET details/json`.
#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub error_message: Option<String>,

    #[serde(default)]
    pub result: Option<RawPlaceDetails>,
}

#[derive(Debug, Deserialize)]
pub struct RawPlaceDetails {
    #[serde(default)]
    pub place_id: Option<String>,

    /// Raw review objects, parsed one by one into [`RawVendorReview`].
    #[serde(default)]
    pub reviews: Vec<serde_json::Value>,
}

/// A provider-hosted review embedded in the place-details response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVendorReview {
    #[serde(default)]
    pub author_name: Option<String>,

    /// Integer stars, 1–5.
    #[serde(default)]
    pub rating: Option<u8>,

    #[serde(default)]
    pub text: Option<String>,

    /// Unix seconds.
    #[serde(default)]
    pub time: Option<i64>,

    #[serde(default)]
    pub relative_time_description: Option<String>,

    #[serde(default)]
    pub profile_photo_url: Option<String>,
}
