//! Normalization from raw provider places to [`dscvr_core::Venue`].
//!
//! Each raw record is normalized independently. A record that cannot be
//! placed on the map fails with [`PlacesError::InvalidVenueData`] and
//! [`normalize_batch`] skips it, so one bad record never empties a search.

use chrono::DateTime;
use dscvr_core::{distance_meters, Coordinate, OpenState, Review, ReviewSource, Venue};

use crate::error::PlacesError;
use crate::types::{RawPlace, RawVendorReview};

/// Ratings at or above this earn the `"Highly Rated"` tag.
pub const HIGHLY_RATED_THRESHOLD: f64 = 4.5;

/// Romantic searches tag venues rated strictly above this as `"Date Night"`.
pub const DATE_NIGHT_MIN_RATING: f64 = 4.0;

const ROMANTIC_VIBE: &str = "romantic";
const DEFAULT_CATEGORY: &str = "Restaurant";
const MAX_CATEGORY_TAGS: usize = 3;
const MAX_PRICE_LEVEL: u8 = 4;
const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Per-search inputs that influence derived tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchContext {
    /// Mood filter chosen by the user, e.g. `"romantic"`.
    pub vibe_filter: Option<String>,
}

impl SearchContext {
    fn is_romantic(&self) -> bool {
        self.vibe_filter
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case(ROMANTIC_VIBE))
    }
}

/// Normalizes a raw place into a [`Venue`] relative to `origin`.
///
/// # Errors
///
/// Returns [`PlacesError::InvalidVenueData`] if the place has no identifier,
/// no name, or a missing/out-of-range coordinate.
pub fn normalize_venue(
    raw: RawPlace,
    origin: Coordinate,
    context: &SearchContext,
) -> Result<Venue, PlacesError> {
    let invalid = |place_id: Option<String>, reason: &str| PlacesError::InvalidVenueData {
        place_id,
        reason: reason.to_owned(),
    };

    let Some(id) = raw.place_id.filter(|id| !id.trim().is_empty()) else {
        return Err(invalid(None, "missing place_id"));
    };
    let Some(name) = raw.name.filter(|n| !n.trim().is_empty()) else {
        return Err(invalid(Some(id), "missing name"));
    };

    let location = raw.geometry.and_then(|g| g.location);
    let Some((lat, lng)) = location.and_then(|l| l.lat.zip(l.lng)) else {
        return Err(invalid(Some(id), "missing coordinate"));
    };
    let coordinate = match Coordinate::new(lat, lng) {
        Ok(c) => c,
        Err(e) => return Err(invalid(Some(id), &e.to_string())),
    };

    // Missing ratings count as zero for ranking and tag thresholds alike.
    let rating = raw.rating.unwrap_or(0.0).clamp(0.0, 5.0);
    let review_count = raw.user_ratings_total.unwrap_or(0);

    let category_tags: Vec<String> = raw
        .types
        .unwrap_or_default()
        .iter()
        .map(|t| humanize_tag(t))
        .filter(|t| !t.is_empty())
        .collect();

    let category = category_tags
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());

    let mut tags: Vec<String> = category_tags.into_iter().take(MAX_CATEGORY_TAGS).collect();
    if context.is_romantic() && rating > DATE_NIGHT_MIN_RATING {
        tags.push("Date Night".to_owned());
    }
    if rating >= HIGHLY_RATED_THRESHOLD {
        tags.push("Highly Rated".to_owned());
    }

    let photo_refs = raw
        .photos
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.photo_reference)
        .filter(|r| !r.is_empty())
        .collect();

    Ok(Venue {
        id,
        name,
        category,
        rating,
        review_count,
        distance_meters: distance_meters(origin, coordinate),
        price_label: price_label(raw.price_level),
        open_state: OpenState::from(raw.opening_hours.and_then(|h| h.open_now)),
        tags,
        coordinate,
        photo_refs,
    })
}

/// Normalizes every record, skipping the ones that fail.
///
/// Skipped records are logged at `warn`; the batch itself never fails.
#[must_use]
pub fn normalize_batch(
    raws: Vec<RawPlace>,
    origin: Coordinate,
    context: &SearchContext,
) -> Vec<Venue> {
    let total = raws.len();
    let venues: Vec<Venue> = raws
        .into_iter()
        .filter_map(|raw| match normalize_venue(raw, origin, context) {
            Ok(venue) => Some(venue),
            Err(e) => {
                tracing::warn!(error = %e, "skipping place that failed normalization");
                None
            }
        })
        .collect();

    if venues.len() < total {
        tracing::info!(
            total,
            kept = venues.len(),
            skipped = total - venues.len(),
            "normalized venue batch with skipped records"
        );
    }
    venues
}

/// Turns a provider tag like `"night_club"` into `"Night Club"`.
///
/// Underscores become spaces and the first letter of each word is
/// upper-cased; the rest of each word is left as-is.
#[must_use]
pub fn humanize_tag(tag: &str) -> String {
    tag.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"$"` repeated once per price level; empty when the level is unknown.
///
/// Levels above the provider maximum of 4 are clamped.
#[must_use]
pub fn price_label(price_level: Option<u8>) -> String {
    price_level
        .map(|level| "$".repeat(usize::from(level.min(MAX_PRICE_LEVEL))))
        .unwrap_or_default()
}

/// Converts a provider review into a [`Review`] tagged [`ReviewSource::Vendor`].
///
/// The provider does not expose review identifiers, so the id is derived from
/// the place and the review's position in the response. Returns `None` when
/// the rating is missing or outside 1–5.
#[must_use]
pub fn normalize_vendor_review(
    raw: RawVendorReview,
    place_id: &str,
    index: usize,
) -> Option<Review> {
    let rating = raw.rating.filter(|r| (1..=5).contains(r))?;

    let created_at = raw
        .time
        .filter(|t| *t > 0)
        .and_then(|t| DateTime::from_timestamp(t, 0));

    let relative_time = raw
        .relative_time_description
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty());

    Some(Review {
        id: format!("{place_id}:vendor:{index}"),
        place_id: place_id.to_owned(),
        author_name: raw
            .author_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_owned()),
        rating,
        body: raw.text.unwrap_or_default(),
        created_at,
        relative_time,
        source: ReviewSource::Vendor,
        media: Vec::new(),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
