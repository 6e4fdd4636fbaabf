use axum::{
    extract::{Query, State},
    Extension, Json,
};
use dscvr_core::{Coordinate, Venue};
use dscvr_places::SearchRequest;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_places_error, validation_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Provider ceiling for nearby-search radius.
const MAX_RADIUS_METERS: u32 = 50_000;

#[derive(Debug, Deserialize)]
pub(super) struct VenueSearchQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
    /// Comma-separated provider category types, e.g. `restaurant,bar`.
    pub types: Option<String>,
    pub keyword: Option<String>,
    pub vibe: Option<String>,
}

impl VenueSearchQuery {
    fn into_search_request(
        self,
        req_id: &str,
        default_radius_meters: u32,
    ) -> Result<SearchRequest, ApiError> {
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            return Err(validation_error(req_id, "lat and lng are required"));
        };
        let origin =
            Coordinate::new(lat, lng).map_err(|e| validation_error(req_id, e.to_string()))?;

        let radius_meters = self.radius.unwrap_or(default_radius_meters);
        if !(1..=MAX_RADIUS_METERS).contains(&radius_meters) {
            return Err(validation_error(
                req_id,
                format!("radius must be between 1 and {MAX_RADIUS_METERS} meters"),
            ));
        }

        let category_types = self
            .types
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        Ok(SearchRequest {
            origin,
            radius_meters,
            category_types,
            keyword: non_blank(self.keyword),
            vibe_filter: non_blank(self.vibe),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// GET /api/v1/venues: ranked venues around a coordinate.
pub(super) async fn search_venues(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<VenueSearchQuery>,
) -> Result<Json<ApiResponse<Vec<Venue>>>, ApiError> {
    let request = query.into_search_request(&req_id.0, state.default_radius_meters)?;

    let venues = dscvr_places::discover_venues(&state.places, &request)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: venues,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lat: Option<f64>, lng: Option<f64>) -> VenueSearchQuery {
        VenueSearchQuery {
            lat,
            lng,
            radius: None,
            types: None,
            keyword: None,
            vibe: None,
        }
    }

    #[test]
    fn missing_coordinate_is_rejected() {
        let err = query(Some(32.0), None)
            .into_search_request("req", 5000)
            .unwrap_err();
        assert_eq!(err.error.code, "validation_error");
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let err = query(Some(91.0), Some(0.0))
            .into_search_request("req", 5000)
            .unwrap_err();
        assert_eq!(err.error.code, "validation_error");
        assert!(err.error.message.contains("latitude"));
    }

    #[test]
    fn radius_defaults_and_is_bounded() {
        let request = query(Some(32.0), Some(-79.0))
            .into_search_request("req", 4200)
            .unwrap();
        assert_eq!(request.radius_meters, 4200);

        let mut q = query(Some(32.0), Some(-79.0));
        q.radius = Some(50_001);
        assert!(q.into_search_request("req", 4200).is_err());

        let mut q = query(Some(32.0), Some(-79.0));
        q.radius = Some(0);
        assert!(q.into_search_request("req", 4200).is_err());
    }

    #[test]
    fn types_are_split_and_blank_strings_dropped() {
        let mut q = query(Some(32.0), Some(-79.0));
        q.types = Some(" bar, ,night_club ".to_owned());
        q.keyword = Some("   ".to_owned());
        q.vibe = Some(" romantic ".to_owned());

        let request = q.into_search_request("req", 5000).unwrap();
        assert_eq!(request.category_types, vec!["bar", "night_club"]);
        assert_eq!(request.keyword, None);
        assert_eq!(request.vibe_filter.as_deref(), Some("romantic"));
    }
}
