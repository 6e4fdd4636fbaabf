use chrono::{DateTime, Utc};
use dscvr_core::{Review, ReviewSource};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Longest review body accepted, in characters.
pub const MAX_REVIEW_BODY_CHARS: usize = 4_000;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub public_id: Uuid,
    pub place_id: String,
    pub author_name: String,
    pub rating: i16,
    pub body: String,
    pub media: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ReviewRow {
    /// Converts the stored row into a first-party [`Review`].
    #[must_use]
    pub fn into_review(self) -> Review {
        Review {
            id: self.public_id.to_string(),
            place_id: self.place_id,
            author_name: self.author_name,
            // reviews_rating_range keeps stored ratings in 1..=5.
            rating: u8::try_from(self.rating).unwrap_or_default(),
            body: self.body,
            created_at: Some(self.created_at),
            relative_time: None,
            source: ReviewSource::FirstParty,
            media: self.media,
        }
    }
}

/// A first-party review about to be stored.
#[derive(Debug, Clone, Copy)]
pub struct NewReview<'a> {
    pub place_id: &'a str,
    pub author_name: &'a str,
    /// Wider than the stored range so out-of-range input reaches validation.
    pub rating: i16,
    pub body: &'a str,
    pub media: &'a [String],
}

/// Checks a review against the store's rules without touching the database.
///
/// # Errors
///
/// Returns [`DbError::InvalidRating`] for ratings outside 1–5, or
/// [`DbError::InvalidReview`] for a blank place id or author name, or an
/// over-long body.
pub fn validate_new_review(review: &NewReview<'_>) -> Result<(), DbError> {
    if !(1..=5).contains(&review.rating) {
        return Err(DbError::InvalidRating(review.rating));
    }
    if review.place_id.trim().is_empty() {
        return Err(DbError::InvalidReview("place_id must not be empty".to_owned()));
    }
    if review.author_name.trim().is_empty() {
        return Err(DbError::InvalidReview(
            "author_name must not be empty".to_owned(),
        ));
    }
    if review.body.chars().count() > MAX_REVIEW_BODY_CHARS {
        return Err(DbError::InvalidReview(format!(
            "body exceeds {MAX_REVIEW_BODY_CHARS} characters"
        )));
    }
    Ok(())
}

/// Validate and insert a first-party review. Returns the stored row.
///
/// Place id and author name are stored trimmed.
///
/// # Errors
///
/// Returns a validation error from [`validate_new_review`] before any query
/// runs, or [`DbError::Sqlx`] on database failure.
pub async fn insert_review(pool: &PgPool, review: &NewReview<'_>) -> Result<ReviewRow, DbError> {
    validate_new_review(review)?;

    let row = sqlx::query_as::<_, ReviewRow>(
        "INSERT INTO reviews (place_id, author_name, rating, body, media) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, public_id, place_id, author_name, rating, body, media, created_at",
    )
    .bind(review.place_id.trim())
    .bind(review.author_name.trim())
    .bind(review.rating)
    .bind(review.body)
    .bind(review.media)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// List all stored reviews for a place, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on database query failure.
pub async fn list_reviews_for_place(
    pool: &PgPool,
    place_id: &str,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, public_id, place_id, author_name, rating, body, media, created_at \
         FROM reviews \
         WHERE place_id = $1 \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(place_id.trim())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
