//! Shared configuration and domain types for the donorlink workspace.
//!
//! Nothing in this crate performs I/O beyond reading environment variables.

pub mod app_config;
pub mod blood;
mod config;
pub mod location;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use blood::BloodGroup;
pub use config::{load_app_config, load_app_config_from_env};
pub use location::{
    coordinate_fallback, parse_legacy_coordinates, GeoPoint, LocationInput, LocationSignal,
    ResolutionState, ResolvedLocation, NOT_PROVIDED,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid blood group: {0}")]
    InvalidBloodGroup(String),
}
