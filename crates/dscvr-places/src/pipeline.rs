//! End-to-end discovery: provider search, normalization, ranking.

use dscvr_core::{Coordinate, Review, Venue};

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::normalize::{normalize_batch, normalize_vendor_review, SearchContext};
use crate::rank::rank;
use crate::types::NearbyQuery;

/// Category types searched when the caller does not name any.
pub const DEFAULT_CATEGORY_TYPES: &[&str] = &["restaurant", "bar", "night_club", "cafe"];

/// A venue search as requested by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: Coordinate,
    pub radius_meters: u32,
    /// Empty means [`DEFAULT_CATEGORY_TYPES`].
    pub category_types: Vec<String>,
    pub keyword: Option<String>,
    pub vibe_filter: Option<String>,
}

impl SearchRequest {
    fn to_query(&self) -> NearbyQuery {
        let category_types = if self.category_types.is_empty() {
            DEFAULT_CATEGORY_TYPES
                .iter()
                .map(|t| (*t).to_owned())
                .collect()
        } else {
            self.category_types.clone()
        };

        NearbyQuery {
            location: self.origin,
            radius_meters: self.radius_meters,
            category_types,
            keyword: self.keyword.clone(),
        }
    }
}

/// Searches the provider and returns the ranked top venues.
///
/// Records that fail normalization are skipped, so the result may be shorter
/// than the provider page.
///
/// # Errors
///
/// Provider failures from [`PlacesClient::nearby_search`] are returned as-is.
pub async fn discover_venues(
    client: &PlacesClient,
    request: &SearchRequest,
) -> Result<Vec<Venue>, PlacesError> {
    let raws = client.nearby_search(&request.to_query()).await?;
    let context = SearchContext {
        vibe_filter: request.vibe_filter.clone(),
    };

    let venues = normalize_batch(raws, request.origin, &context);
    let ranked = rank(&venues);

    tracing::info!(
        candidates = venues.len(),
        returned = ranked.len(),
        radius_meters = request.radius_meters,
        "venue discovery complete"
    );
    Ok(ranked)
}

/// Fetches and normalizes the provider-hosted reviews for a place.
///
/// Reviews without a usable rating are dropped.
///
/// # Errors
///
/// Provider failures from [`PlacesClient::place_reviews`] are returned as-is.
pub async fn fetch_vendor_reviews(
    client: &PlacesClient,
    place_id: &str,
) -> Result<Vec<Review>, PlacesError> {
    let raws = client.place_reviews(place_id).await?;
    let total = raws.len();

    let reviews: Vec<Review> = raws
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| normalize_vendor_review(raw, place_id, index))
        .collect();

    if reviews.len() < total {
        tracing::debug!(
            place_id,
            total,
            kept = reviews.len(),
            "dropped vendor reviews without a valid rating"
        );
    }
    Ok(reviews)
}
