//! Shared domain types for the therapist finder.
//!
//! Everything here is runtime-agnostic except [`events::EventBus`], which
//! rides on a `tokio` broadcast channel so any component can publish
//! notifications without knowing who listens.

pub mod app_config;
pub mod config;
pub mod events;
pub mod geo;
pub mod provider;
pub mod query;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use events::{EventBus, LocationErrorKind, Notification, PermissionState};
pub use geo::{
    distance_miles, round_tenth, Bounds, Coordinate, CoordinateError, Fix, EARTH_RADIUS_MILES,
};
pub use provider::{
    initials_for_name, specialty_for_name, ProviderRecord, Rating, RatingSource, Review,
    DEFAULT_SPECIALTY,
};
pub use query::SearchQuery;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
