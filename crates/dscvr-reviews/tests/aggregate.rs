//! Behavioral tests for `aggregate_at`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use dscvr_core::{Review, ReviewSource};
use dscvr_reviews::{aggregate, aggregate_at, display_date};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 18, 0, 0).unwrap()
}

fn first_party(id: &str, rating: u8, days_ago: i64) -> Review {
    Review {
        id: id.to_owned(),
        place_id: "p-1".to_owned(),
        author_name: format!("author {id}"),
        rating,
        body: "Lovely evening.".to_owned(),
        created_at: Some(now() - Duration::days(days_ago)),
        relative_time: None,
        source: ReviewSource::FirstParty,
        media: vec![],
    }
}

fn vendor(id: &str, rating: u8, relative: Option<&str>) -> Review {
    Review {
        id: id.to_owned(),
        place_id: "p-1".to_owned(),
        author_name: format!("author {id}"),
        rating,
        body: "Fine.".to_owned(),
        created_at: None,
        relative_time: relative.map(str::to_owned),
        source: ReviewSource::Vendor,
        media: vec![],
    }
}

fn ids(reviews: &[Review]) -> Vec<&str> {
    reviews.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn vendor_ratings_are_excluded_from_average() {
    let summary = aggregate_at(
        vec![first_party("a", 4, 1), first_party("b", 5, 2)],
        vec![vendor("v", 1, Some("a week ago"))],
        now(),
    );
    assert_eq!(summary.average_rating, Some(4.5));
    assert_eq!(summary.merged.len(), 3);
}

#[test]
fn no_first_party_reviews_means_no_average() {
    let summary = aggregate_at(vec![], vec![vendor("v", 5, Some("yesterday"))], now());
    assert_eq!(summary.average_rating, None);
    assert_eq!(ids(&summary.merged), vec!["v"]);
}

#[test]
fn empty_inputs_give_empty_summary() {
    let summary = aggregate_at(vec![], vec![], now());
    assert_eq!(summary.average_rating, None);
    assert!(summary.merged.is_empty());
}

#[test]
fn merged_list_is_newest_first_across_sources() {
    let summary = aggregate_at(
        vec![first_party("fp-10d", 4, 10), first_party("fp-1d", 5, 1)],
        vec![
            vendor("v-3mo", 3, Some("3 months ago")),
            vendor("v-3d", 4, Some("3 days ago")),
            vendor("v-now", 5, Some("a moment ago")),
        ],
        now(),
    );
    assert_eq!(
        ids(&summary.merged),
        vec!["v-now", "fp-1d", "v-3d", "fp-10d", "v-3mo"]
    );
}

#[test]
fn undated_reviews_sort_last_in_input_order() {
    let summary = aggregate_at(
        vec![first_party("fp", 4, 400)],
        vec![
            vendor("v-none", 3, None),
            vendor("v-odd", 3, Some("sometime in spring")),
            vendor("v-week", 3, Some("last week")),
        ],
        now(),
    );
    assert_eq!(ids(&summary.merged), vec!["v-week", "fp", "v-none", "v-odd"]);
}

#[test]
fn ties_keep_first_party_before_vendor() {
    let mut v = vendor("v", 2, None);
    v.created_at = Some(now() - Duration::days(2));
    let summary = aggregate_at(vec![first_party("fp", 4, 2)], vec![v], now());
    assert_eq!(ids(&summary.merged), vec!["fp", "v"]);
}

#[test]
fn vendor_reviews_in_the_same_bucket_keep_vendor_order() {
    let summary = aggregate_at(
        vec![],
        vec![
            vendor("v1", 4, Some("2 weeks ago")),
            vendor("v2", 3, Some("3 weeks ago")),
            vendor("v3", 5, Some("2 weeks ago")),
            vendor("v4", 2, Some("a week ago")),
            vendor("v5", 4, Some("7 days ago")),
        ],
        now(),
    );
    assert_eq!(ids(&summary.merged), vec!["v4", "v5", "v1", "v3", "v2"]);
}

#[test]
fn reviews_are_retagged_with_their_list_source() {
    let mut mislabeled = first_party("x", 3, 5);
    mislabeled.source = ReviewSource::Vendor;
    let mut also_mislabeled = vendor("y", 3, Some("2 days ago"));
    also_mislabeled.source = ReviewSource::FirstParty;

    let summary = aggregate_at(vec![mislabeled], vec![also_mislabeled], now());
    let by_id = |id: &str| {
        summary
            .merged
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.source)
    };
    assert_eq!(by_id("x"), Some(ReviewSource::FirstParty));
    assert_eq!(by_id("y"), Some(ReviewSource::Vendor));
}

#[test]
fn display_dates_follow_merged_order() {
    let summary = aggregate_at(
        vec![first_party("fp", 5, 7)],
        vec![vendor("v", 4, Some("2 months ago"))],
        now(),
    );
    let labels: Vec<String> = summary
        .merged
        .iter()
        .map(|r| display_date(r, now()))
        .collect();
    assert_eq!(labels, vec!["1 weeks ago", "2 months ago"]);
}

#[test]
fn aggregate_uses_current_time() {
    let recent = Review {
        created_at: Some(Utc::now() - Duration::hours(1)),
        ..first_party("recent", 5, 0)
    };
    let summary = aggregate(vec![recent], vec![vendor("old", 2, Some("a year ago"))]);
    assert_eq!(ids(&summary.merged), vec!["recent", "old"]);
}

#[test]
fn summary_serializes_average_and_sources() {
    let summary = aggregate_at(vec![first_party("a", 4, 1)], vec![], now());
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["average_rating"], 4.0);
    assert_eq!(json["merged"][0]["source"], "first_party");
}
