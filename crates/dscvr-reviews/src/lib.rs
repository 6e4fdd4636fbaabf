//! Review aggregation for dscvr.
//!
//! Merges first-party reviews from the review store with vendor reviews from
//! the places provider, computes the first-party average, and orders the
//! result newest first. Everything here is pure; callers supply "now".

pub mod aggregate;
pub mod relative_time;

pub use aggregate::{aggregate, aggregate_at, ApproximateInstant, ReviewSummary};
pub use relative_time::{
    display_date, format_relative_date, format_relative_date_str, parse_relative_description,
};
