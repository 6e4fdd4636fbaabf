//! Place review handlers: aggregated listing and first-party submission.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use dscvr_core::Review;
use dscvr_db::NewReview;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{
    map_db_error, map_places_error, validation_error, ApiError, ApiResponse, AppState,
    ResponseMeta,
};

const MAX_MEDIA_ITEMS: usize = 10;

#[derive(Debug, Deserialize)]
pub(super) struct CreateReviewRequest {
    pub author_name: String,
    pub rating: i16,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub media: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ReviewItem {
    #[serde(flatten)]
    pub review: Review,
    /// `"3 days ago"`, or the vendor's own wording when no timestamp exists.
    pub display_date: String,
}

impl ReviewItem {
    fn new(review: Review, now: DateTime<Utc>) -> Self {
        let display_date = dscvr_reviews::display_date(&review, now);
        Self {
            review,
            display_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PlaceReviewsData {
    pub place_id: String,
    pub average_rating: Option<f64>,
    pub review_count: usize,
    pub reviews: Vec<ReviewItem>,
}

fn require_place_id(req_id: &str, place_id: &str) -> Result<String, ApiError> {
    let place_id = place_id.trim();
    if place_id.is_empty() {
        return Err(validation_error(req_id, "place_id must not be empty"));
    }
    Ok(place_id.to_owned())
}

/// GET /api/v1/places/{place_id}/reviews: stored and vendor reviews, merged.
pub(super) async fn list_place_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<ApiResponse<PlaceReviewsData>>, ApiError> {
    let rid = &req_id.0;
    let place_id = require_place_id(rid, &place_id)?;

    let (stored, vendor) = tokio::join!(
        dscvr_db::list_reviews_for_place(&state.pool, &place_id),
        dscvr_places::fetch_vendor_reviews(&state.places, &place_id),
    );
    let first_party: Vec<Review> = stored
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .into_iter()
        .map(dscvr_db::ReviewRow::into_review)
        .collect();
    let vendor = vendor.map_err(|e| map_places_error(rid.clone(), &e))?;

    let now = Utc::now();
    let summary = dscvr_reviews::aggregate_at(first_party, vendor, now);

    let reviews: Vec<ReviewItem> = summary
        .merged
        .into_iter()
        .map(|review| ReviewItem::new(review, now))
        .collect();

    Ok(Json(ApiResponse {
        data: PlaceReviewsData {
            place_id,
            average_rating: summary.average_rating,
            review_count: reviews.len(),
            reviews,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/places/{place_id}/reviews: store a first-party review.
pub(super) async fn create_place_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewItem>>), ApiError> {
    let rid = &req_id.0;
    let place_id = require_place_id(rid, &place_id)?;

    if body.media.len() > MAX_MEDIA_ITEMS {
        return Err(validation_error(
            rid,
            format!("at most {MAX_MEDIA_ITEMS} media items are allowed"),
        ));
    }

    let new_review = NewReview {
        place_id: &place_id,
        author_name: &body.author_name,
        rating: body.rating,
        body: body.body.trim(),
        media: &body.media,
    };
    let row = dscvr_db::insert_review(&state.pool, &new_review)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(place_id = %row.place_id, rating = row.rating, "stored first-party review");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ReviewItem::new(row.into_review(), Utc::now()),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
