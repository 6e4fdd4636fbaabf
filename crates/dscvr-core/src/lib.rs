//! Shared domain types and configuration for the dscvr workspace.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod review;
pub mod venue;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_meters, Coordinate, EARTH_RADIUS_METERS};
pub use review::{Review, ReviewSource};
pub use venue::{OpenState, Venue};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: &'static str,
    },

    #[error("invalid review source: {0}")]
    InvalidReviewSource(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
