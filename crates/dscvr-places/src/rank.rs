//! Venue ranking: rating first, with proximity breaking near-ties.
//!
//! Two venues whose ratings differ by at most [`RATING_TIE_THRESHOLD`] are
//! ordered by distance, nearest first. Otherwise the higher rating wins.
//! This is not a lexicographic (rating, distance) sort: a 4.6 venue two
//! kilometers away ranks *below* a 4.5 venue next door.
//!
//! The pairwise rule is not transitive: 4.5 ties 4.65 and 4.65 ties 4.8, yet
//! 4.5 and 4.8 are ordered by rating. The slice sorts in `std` may panic on
//! comparators that are not a total order, so they are off limits here.
//! [`rank`] uses a stable insertion sort instead, which is well-defined for
//! any comparator and cheap at provider page sizes.

use std::cmp::Ordering;

use dscvr_core::Venue;

/// Ratings this close are treated as a tie and broken by distance.
pub const RATING_TIE_THRESHOLD: f64 = 0.2;

/// Number of venues returned by [`rank`].
pub const MAX_RANKED_RESULTS: usize = 10;

/// Absorbs representation error so that e.g. `4.7 - 4.5` counts as `0.2`.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Orders two venues by the near-tie rule. `Less` means `a` ranks first.
#[must_use]
pub fn compare_venues(a: &Venue, b: &Venue) -> Ordering {
    if (a.rating - b.rating).abs() <= RATING_TIE_THRESHOLD + THRESHOLD_EPSILON {
        a.distance_meters.total_cmp(&b.distance_meters)
    } else {
        b.rating.total_cmp(&a.rating)
    }
}

/// Returns the top [`MAX_RANKED_RESULTS`] venues in ranked order.
///
/// The input is left untouched. Equal venues keep their input order.
#[must_use]
pub fn rank(venues: &[Venue]) -> Vec<Venue> {
    let mut ordered: Vec<&Venue> = Vec::with_capacity(venues.len());
    for venue in venues {
        // Insert after the last placed venue that does not rank below this one.
        let at = ordered
            .iter()
            .rposition(|placed| compare_venues(placed, venue) != Ordering::Greater)
            .map_or(0, |i| i + 1);
        ordered.insert(at, venue);
    }

    ordered
        .into_iter()
        .take(MAX_RANKED_RESULTS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use dscvr_core::{Coordinate, OpenState};

    use super::*;

    fn venue(id: &str, rating: f64, distance_meters: f64) -> Venue {
        Venue {
            id: id.to_owned(),
            name: format!("Venue {id}"),
            category: "Restaurant".to_owned(),
            rating,
            review_count: 10,
            distance_meters,
            price_label: "$$".to_owned(),
            open_state: OpenState::Unknown,
            tags: vec![],
            coordinate: Coordinate {
                latitude: 0.0,
                longitude: 0.0,
            },
            photo_refs: vec![],
        }
    }

    fn ids(venues: &[Venue]) -> Vec<&str> {
        venues.iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn near_equal_ratings_are_ordered_by_distance() {
        let input = vec![venue("far", 4.5, 5000.0), venue("near", 4.6, 1000.0)];
        assert_eq!(ids(&rank(&input)), vec!["near", "far"]);
    }

    #[test]
    fn distant_ratings_are_ordered_by_rating() {
        let input = vec![venue("close", 4.5, 100.0), venue("best", 5.0, 9000.0)];
        assert_eq!(ids(&rank(&input)), vec!["best", "close"]);
    }

    #[test]
    fn difference_of_exactly_threshold_counts_as_tie() {
        // 4.7 - 4.5 is 0.2000000000000002 in f64.
        let input = vec![venue("far", 4.7, 3000.0), venue("near", 4.5, 200.0)];
        assert_eq!(ids(&rank(&input)), vec!["near", "far"]);
    }

    #[test]
    fn difference_just_above_threshold_is_ordered_by_rating() {
        let input = vec![venue("near", 4.5, 200.0), venue("far", 4.75, 3000.0)];
        assert_eq!(ids(&rank(&input)), vec!["far", "near"]);
    }

    #[test]
    fn truncates_to_ten_after_sorting() {
        // Worst-rated first, so truncating before sorting would keep the wrong ones.
        let input: Vec<Venue> = (0..15)
            .map(|i| venue(&format!("v{i}"), f64::from(i) * 0.3, 100.0))
            .collect();
        let ranked = rank(&input);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].id, "v14");
        assert!(ranked.iter().all(|v| v.rating >= 5.0 * 0.3 - 1e-9));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(rank(&[]).is_empty());
    }

    #[test]
    fn does_not_mutate_input() {
        let input = vec![venue("a", 3.0, 10.0), venue("b", 5.0, 10.0)];
        let before = input.clone();
        let _ = rank(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn equal_venues_keep_input_order() {
        let input = vec![
            venue("first", 4.0, 500.0),
            venue("second", 4.0, 500.0),
            venue("third", 4.0, 500.0),
        ];
        assert_eq!(ids(&rank(&input)), vec!["first", "second", "third"]);
    }

    #[test]
    fn unrated_venues_sink_below_rated_ones() {
        let input = vec![venue("unrated", 0.0, 50.0), venue("rated", 3.9, 4000.0)];
        assert_eq!(ids(&rank(&input)), vec!["rated", "unrated"]);
    }

    #[test]
    fn compare_venues_is_antisymmetric_for_ties() {
        let a = venue("a", 4.5, 100.0);
        let b = venue("b", 4.6, 200.0);
        assert_eq!(compare_venues(&a, &b), Ordering::Less);
        assert_eq!(compare_venues(&b, &a), Ordering::Greater);
    }
}
