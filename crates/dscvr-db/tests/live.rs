//! Live integration tests for dscvr-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/dscvr-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use dscvr_core::ReviewSource;
use dscvr_db::{
    health_check, insert_review, list_reviews_for_place, DbError, NewReview, ReviewRow,
};

fn new_review<'a>(place_id: &'a str, author_name: &'a str, rating: i16) -> NewReview<'a> {
    NewReview {
        place_id,
        author_name,
        rating,
        body: "Candlelit and quiet.",
        media: &[],
    }
}

/// Backdate a stored review so ordering tests do not depend on insert timing.
async fn set_created_at(pool: &sqlx::PgPool, id: i64, days_ago: i32) {
    sqlx::query("UPDATE reviews SET created_at = NOW() - make_interval(days => $2) WHERE id = $1")
        .bind(id)
        .bind(days_ago)
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("set_created_at failed for id {id}: {e}"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_check_succeeds_on_live_pool(pool: sqlx::PgPool) {
    health_check(&pool).await.expect("health check failed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_review_returns_stored_row(pool: sqlx::PgPool) {
    let media = vec!["https://cdn.example/photo.jpg".to_owned()];
    let review = NewReview {
        media: &media,
        ..new_review("  p-1 ", " Ana ", 5)
    };

    let row = insert_review(&pool, &review)
        .await
        .expect("insert_review failed");

    assert!(row.id > 0);
    assert_eq!(row.place_id, "p-1");
    assert_eq!(row.author_name, "Ana");
    assert_eq!(row.rating, 5);
    assert_eq!(row.media, media);
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_review_rejects_out_of_range_rating_before_querying(pool: sqlx::PgPool) {
    let err = insert_review(&pool, &new_review("p-1", "Ana", 0))
        .await
        .expect_err("rating 0 should be rejected");
    assert!(matches!(err, DbError::InvalidRating(0)));

    let rows = list_reviews_for_place(&pool, "p-1")
        .await
        .expect("list failed");
    assert!(rows.is_empty(), "nothing should have been stored");
}

#[sqlx::test(migrations = "../../migrations")]
async fn rating_check_constraint_backs_up_validation(pool: sqlx::PgPool) {
    let result = sqlx::query(
        "INSERT INTO reviews (place_id, author_name, rating) VALUES ('p-1', 'Ana', 6)",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "CHECK constraint should reject rating 6");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_reviews_for_place_is_newest_first_and_scoped(pool: sqlx::PgPool) {
    let old = insert_review(&pool, &new_review("p-1", "Old", 3))
        .await
        .expect("insert old failed");
    let new = insert_review(&pool, &new_review("p-1", "New", 4))
        .await
        .expect("insert new failed");
    insert_review(&pool, &new_review("p-2", "Elsewhere", 5))
        .await
        .expect("insert other failed");

    set_created_at(&pool, old.id, 10).await;
    set_created_at(&pool, new.id, 1).await;

    let rows = list_reviews_for_place(&pool, "p-1")
        .await
        .expect("list failed");
    let authors: Vec<&str> = rows.iter().map(|r| r.author_name.as_str()).collect();
    assert_eq!(authors, vec!["New", "Old"]);

    let reviews: Vec<_> = rows.into_iter().map(ReviewRow::into_review).collect();
    assert!(reviews
        .iter()
        .all(|r| r.source == ReviewSource::FirstParty && r.created_at.is_some()));
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_reviews_for_unknown_place_is_empty(pool: sqlx::PgPool) {
    let rows = list_reviews_for_place(&pool, "nobody-reviewed-this")
        .await
        .expect("list failed");
    assert!(rows.is_empty());
}
