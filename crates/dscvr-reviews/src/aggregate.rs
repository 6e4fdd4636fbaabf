//! Merging first-party and vendor reviews into one list.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use dscvr_core::{Review, ReviewSource};
use serde::Serialize;

use crate::relative_time::parse_relative_description;

/// Sort key for reviews whose age may only be known approximately.
///
/// Ordered chronologically, with [`ApproximateInstant::Unknown`] before every
/// dated value so that a descending sort puts undated reviews last. At the
/// same instant an exact timestamp ranks above an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproximateInstant {
    /// Absolute creation time.
    Exact(DateTime<Utc>),
    /// Derived from a relative description such as `"2 weeks ago"`.
    Estimated(DateTime<Utc>),
    /// Neither a timestamp nor a description we understand.
    Unknown,
}

impl ApproximateInstant {
    /// Derives the sort key for `review` relative to `now`.
    #[must_use]
    pub fn for_review(review: &Review, now: DateTime<Utc>) -> Self {
        if let Some(at) = review.created_at {
            return Self::Exact(at);
        }
        review
            .relative_time
            .as_deref()
            .and_then(|description| parse_relative_description(description, now))
            .map_or(Self::Unknown, Self::Estimated)
    }

    #[must_use]
    pub fn instant(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Exact(at) | Self::Estimated(at) => Some(at),
            Self::Unknown => None,
        }
    }

    fn precision(self) -> u8 {
        match self {
            Self::Exact(_) => 2,
            Self::Estimated(_) => 1,
            Self::Unknown => 0,
        }
    }
}

impl Ord for ApproximateInstant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant()
            .cmp(&other.instant())
            .then_with(|| self.precision().cmp(&other.precision()))
    }
}

impl PartialOrd for ApproximateInstant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    /// Mean first-party rating rounded to one decimal; `None` without any
    /// first-party reviews. Vendor ratings never count.
    pub average_rating: Option<f64>,
    /// Every review, newest first.
    pub merged: Vec<Review>,
}

/// Aggregates reviews as of the current time. See [`aggregate_at`].
#[must_use]
pub fn aggregate(first_party: Vec<Review>, vendor: Vec<Review>) -> ReviewSummary {
    aggregate_at(first_party, vendor, Utc::now())
}

/// Aggregates reviews as of `now`.
///
/// Each review is re-tagged with the source of the list it arrived in. The
/// merged list is sorted newest first by [`ApproximateInstant`]; the sort is
/// stable, so ties keep first-party reviews ahead of vendor reviews and each
/// list's own order.
#[must_use]
pub fn aggregate_at(
    first_party: Vec<Review>,
    vendor: Vec<Review>,
    now: DateTime<Utc>,
) -> ReviewSummary {
    let average_rating = average_rating(&first_party);
    let first_party_count = first_party.len();
    let vendor_count = vendor.len();

    let tagged = first_party
        .into_iter()
        .map(|review| (review, ReviewSource::FirstParty))
        .chain(vendor.into_iter().map(|review| (review, ReviewSource::Vendor)))
        .map(|(mut review, source)| {
            review.source = source;
            review
        });

    let mut keyed: Vec<(ApproximateInstant, Review)> = tagged
        .map(|review| (ApproximateInstant::for_review(&review, now), review))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));

    let undated = keyed
        .iter()
        .filter(|(key, _)| *key == ApproximateInstant::Unknown)
        .count();
    tracing::debug!(
        first_party = first_party_count,
        vendor = vendor_count,
        undated,
        "aggregated reviews"
    );

    ReviewSummary {
        average_rating,
        merged: keyed.into_iter().map(|(_, review)| review).collect(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    let mean = total as f64 / reviews.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}
