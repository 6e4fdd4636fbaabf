//! Retry with exponential back-off and jitter for the places client.
//!
//! Only the HTTP client retries. The discovery pipeline above it surfaces
//! whatever error finally comes out of here unchanged.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 429 and 5xx responses.
///
/// **Not retriable:**
/// - [`PlacesError::QuotaExceeded`]: daily quota; retrying burns more of it.
/// - [`PlacesError::ApiError`]: denied or invalid request.
/// - [`PlacesError::Deserialize`]: malformed body.
/// - Other 4xx statuses, configuration errors, and per-record data errors.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PlacesError::RateLimited { .. } => true,
        PlacesError::UnexpectedStatus { status, .. } => *status >= 500,
        PlacesError::QuotaExceeded(_)
        | PlacesError::ApiError { .. }
        | PlacesError::Deserialize { .. }
        | PlacesError::InvalidBaseUrl { .. }
        | PlacesError::InvalidVenueData { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The n-th retry sleeps `backoff_base_ms × 2ⁿ⁻¹` milliseconds, ±25 % jitter,
/// capped at 30 s. With `max_retries = 2` the operation runs at most 3 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "places provider transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
