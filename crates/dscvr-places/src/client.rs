//! HTTP client for the Google Places web service.
//!
//! Wraps `reqwest` with provider status handling, API key management, and
//! per-record deserialization of result arrays. Transient failures are retried
//! here; everything else is returned to the caller untouched.

use std::collections::HashSet;
use std::time::Duration;

use dscvr_core::config::DEFAULT_PLACES_BASE_URL;
use dscvr_core::AppConfig;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::{Client, StatusCode, Url};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{
    NearbyQuery, NearbySearchResponse, PlaceDetailsResponse, RawPlace, RawVendorReview,
};

const USER_AGENT: &str = "dscvr/0.1 (venue-discovery)";

/// Upper bound on concurrent nearby-search requests for one query.
pub const MAX_CONCURRENT_SEARCHES: usize = 4;

/// Client for the places provider.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, PlacesError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            DEFAULT_PLACES_BASE_URL,
            max_retries,
            backoff_base_ms,
        )
    }

    /// Creates a client from the loaded application configuration.
    ///
    /// # Errors
    ///
    /// See [`PlacesClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(
            &config.places_api_key,
            config.places_timeout_secs,
            &config.places_base_url,
            config.places_max_retries,
            config.places_backoff_base_ms,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        // Exactly one trailing slash, so `Url::join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Runs a nearby search and returns the raw places.
    ///
    /// The endpoint honours a single `type` per request, so one search is sent
    /// per category type, at most [`MAX_CONCURRENT_SEARCHES`] at a time. Pages
    /// are concatenated in category order and a place returned for several
    /// types is kept once, at its first position. Results that do not
    /// deserialize into [`RawPlace`] are dropped with a warning; they never
    /// fail the call.
    ///
    /// # Errors
    ///
    /// The first failing search, in category order:
    ///
    /// - [`PlacesError::QuotaExceeded`] on `OVER_QUERY_LIMIT`.
    /// - [`PlacesError::ApiError`] on any other non-success provider status.
    /// - [`PlacesError::Http`], [`PlacesError::RateLimited`], or
    ///   [`PlacesError::UnexpectedStatus`] on transport failures after retries.
    /// - [`PlacesError::Deserialize`] if the envelope does not parse.
    pub async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<RawPlace>, PlacesError> {
        let urls = self.nearby_search_urls(query)?;
        let searches = urls.len();

        let pages: Vec<Vec<RawPlace>> = stream::iter(urls)
            .map(|url| self.nearby_search_page(url))
            .buffered(MAX_CONCURRENT_SEARCHES)
            .try_collect()
            .await?;

        let total: usize = pages.iter().map(Vec::len).sum();
        let places = dedupe_by_place_id(pages.into_iter().flatten());

        tracing::debug!(
            searches,
            total,
            unique = places.len(),
            radius_meters = query.radius_meters,
            "nearby search complete"
        );
        Ok(places)
    }

    async fn nearby_search_page(&self, url: Url) -> Result<Vec<RawPlace>, PlacesError> {
        let body = self.request_json(&url).await?;
        Self::check_api_status(&body)?;

        let envelope: NearbySearchResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: "nearbysearch envelope".to_owned(),
                source: e,
            })?;

        Ok(envelope
            .results
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawPlace>(value) {
                Ok(place) => Some(place),
                Err(e) => {
                    tracing::warn!(error = %e, "dropping place result with unexpected shape");
                    None
                }
            })
            .collect())
    }

    /// Fetches the provider-hosted reviews embedded in a place's details.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::nearby_search`]. A details response with no
    /// `result` or no `reviews` yields an empty list.
    pub async fn place_reviews(&self, place_id: &str) -> Result<Vec<RawVendorReview>, PlacesError> {
        let url = self.build_url(
            "details/json",
            &[("place_id", place_id), ("fields", "place_id,reviews")],
        )?;
        let body = self.request_json(&url).await?;
        Self::check_api_status(&body)?;

        let envelope: PlaceDetailsResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;

        let reviews = envelope
            .result
            .map(|details| details.reviews)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawVendorReview>(value) {
                Ok(review) => Some(review),
                Err(e) => {
                    tracing::warn!(place_id, error = %e, "dropping review with unexpected shape");
                    None
                }
            })
            .collect();

        Ok(reviews)
    }

    /// One URL per non-blank category type, or a single untyped URL when
    /// there are none.
    fn nearby_search_urls(&self, query: &NearbyQuery) -> Result<Vec<Url>, PlacesError> {
        let location = format!(
            "{},{}",
            query.location.latitude, query.location.longitude
        );
        let radius = query.radius_meters.to_string();
        let keyword = query
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        let mut types: Vec<Option<&str>> = Vec::new();
        for t in query.category_types.iter().map(|t| t.trim()) {
            if !t.is_empty() && !types.contains(&Some(t)) {
                types.push(Some(t));
            }
        }
        if types.is_empty() {
            types.push(None);
        }

        types
            .into_iter()
            .map(|category| {
                let mut params = vec![("location", location.as_str()), ("radius", radius.as_str())];
                if let Some(category) = category {
                    params.push(("type", category));
                }
                if let Some(keyword) = keyword {
                    params.push(("keyword", keyword));
                }
                self.build_url("nearbysearch/json", &params)
            })
            .collect()
    }

    /// Builds an endpoint URL with the API key and percent-encoded parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET with retries, checks the HTTP status, and parses the body
    /// as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let display_url = redact_key(url);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let display_url = display_url.clone();
            async move {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| PlacesError::Http(e.without_url()))?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(PlacesError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(PlacesError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: display_url,
                    });
                }

                let body = response
                    .text()
                    .await
                    .map_err(|e| PlacesError::Http(e.without_url()))?;
                serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                    context: display_url,
                    source: e,
                })
            }
        })
        .await
    }

    /// Maps the provider `status` field onto typed errors.
    fn check_api_status(body: &serde_json::Value) -> Result<(), PlacesError> {
        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("OK");
        let message = || {
            body.get("error_message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("no error message")
                .to_owned()
        };

        match status {
            "OK" | "ZERO_RESULTS" => Ok(()),
            "OVER_QUERY_LIMIT" => Err(PlacesError::QuotaExceeded(message())),
            other => Err(PlacesError::ApiError {
                status: other.to_owned(),
                message: message(),
            }),
        }
    }
}

/// Keeps the first occurrence of each `place_id`. Places without one are kept
/// as-is for the normalizer to reject.
fn dedupe_by_place_id(places: impl IntoIterator<Item = RawPlace>) -> Vec<RawPlace> {
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter(|place| match place.place_id.as_deref() {
            Some(id) => seen.insert(id.to_owned()),
            None => true,
        })
        .collect()
}

/// Renders `url` with the `key` query parameter masked, for logs and errors.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" {
                "[redacted]".to_owned()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
