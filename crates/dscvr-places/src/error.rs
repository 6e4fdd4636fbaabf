use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure. The request URL is stripped before wrapping
    /// because it carries the API key.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by places provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// The provider answered `OVER_QUERY_LIMIT`.
    #[error("places quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any provider status other than `OK`, `ZERO_RESULTS`, or `OVER_QUERY_LIMIT`.
    #[error("places API error {status}: {message}")]
    ApiError { status: String, message: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid places base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// A single raw place could not be normalized. Callers skip the record.
    #[error("invalid venue data for {}: {reason}", .place_id.as_deref().unwrap_or("<unknown place>"))]
    InvalidVenueData {
        place_id: Option<String>,
        reason: String,
    },
}

impl PlacesError {
    /// `true` for failures of the upstream provider, as opposed to bad input
    /// data or local configuration.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PlacesError::Http(_)
                | PlacesError::RateLimited { .. }
                | PlacesError::QuotaExceeded(_)
                | PlacesError::ApiError { .. }
                | PlacesError::UnexpectedStatus { .. }
                | PlacesError::Deserialize { .. }
        )
    }
}
