pub mod client;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub(crate) mod retry;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use normalize::{normalize_batch, normalize_vendor_review, normalize_venue, SearchContext};
pub use pipeline::{discover_venues, fetch_vendor_reviews, SearchRequest};
pub use rank::rank;
pub use types::{NearbyQuery, RawPlace, RawVendorReview};
