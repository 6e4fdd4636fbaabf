//! Command handlers for the CLI.
//!
//! Called from `main` once configuration and logging are set up. Results go to
//! stdout as pretty-printed JSON; diagnostics go to stderr through `tracing`.

use anyhow::Context;
use chrono::{DateTime, Utc};
use dscvr_core::{AppConfig, Coordinate, Review};
use dscvr_places::{PlacesClient, SearchRequest};
use serde::Serialize;

#[derive(Debug)]
pub(crate) struct SearchArgs {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<u32>,
    pub types: Vec<String>,
    pub keyword: Option<String>,
    pub vibe: Option<String>,
}

impl SearchArgs {
    pub(crate) fn into_request(self, default_radius_meters: u32) -> anyhow::Result<SearchRequest> {
        let origin = Coordinate::new(self.lat, self.lng)?;
        let radius_meters = self.radius.unwrap_or(default_radius_meters);
        anyhow::ensure!(radius_meters > 0, "--radius must be greater than zero");

        Ok(SearchRequest {
            origin,
            radius_meters,
            category_types: self
                .types
                .into_iter()
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty())
                .collect(),
            keyword: self.keyword.filter(|k| !k.trim().is_empty()),
            vibe_filter: self.vibe.filter(|v| !v.trim().is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
struct ReviewOutput {
    #[serde(flatten)]
    review: Review,
    display_date: String,
}

#[derive(Debug, Serialize)]
struct PlaceReviewsOutput {
    place_id: String,
    average_rating: Option<f64>,
    reviews: Vec<ReviewOutput>,
}

fn build_reviews_output(
    place_id: &str,
    first_party: Vec<Review>,
    vendor: Vec<Review>,
    now: DateTime<Utc>,
) -> PlaceReviewsOutput {
    let summary = dscvr_reviews::aggregate_at(first_party, vendor, now);
    PlaceReviewsOutput {
        place_id: place_id.to_owned(),
        average_rating: summary.average_rating,
        reviews: summary
            .merged
            .into_iter()
            .map(|review| {
                let display_date = dscvr_reviews::display_date(&review, now);
                ReviewOutput {
                    review,
                    display_date,
                }
            })
            .collect(),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}

/// Run a venue search and print the ranked venues.
pub(crate) async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let request = args.into_request(config.search_radius_meters)?;
    let client = PlacesClient::from_app_config(config)?;

    let venues = dscvr_places::discover_venues(&client, &request)
        .await
        .context("venue search failed")?;

    tracing::info!(count = venues.len(), "venue search returned results");
    print_json(&venues)
}

/// Fetch stored and vendor reviews concurrently and print the merged list.
pub(crate) async fn run_reviews(config: &AppConfig, place_id: &str) -> anyhow::Result<()> {
    let place_id = place_id.trim();
    anyhow::ensure!(!place_id.is_empty(), "place_id must not be empty");

    let pool_config = dscvr_db::PoolConfig::from_app_config(config);
    let pool = dscvr_db::connect_pool(&config.database_url, pool_config).await?;
    let client = PlacesClient::from_app_config(config)?;

    let (stored, vendor) = tokio::join!(
        dscvr_db::list_reviews_for_place(&pool, place_id),
        dscvr_places::fetch_vendor_reviews(&client, place_id),
    );
    let first_party = stored
        .context("failed to load stored reviews")?
        .into_iter()
        .map(dscvr_db::ReviewRow::into_review)
        .collect();
    let vendor = vendor.context("failed to fetch vendor reviews")?;

    print_json(&build_reviews_output(place_id, first_party, vendor, Utc::now()))
}

/// Apply pending migrations and report how many ran.
pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool_config = dscvr_db::PoolConfig::from_app_config(config);
    let pool = dscvr_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = dscvr_db::run_migrations(&pool).await?;

    tracing::info!(applied, "migrations complete");
    print_json(&serde_json::json!({ "applied": applied }))
}
