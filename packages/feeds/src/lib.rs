#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feeds shown next to the simulated dashboards.
//!
//! Two live clients bypass the mock generator entirely:
//! [`air_quality::AirQualityClient`] (`OpenWeatherMap` air pollution) and
//! [`traffic::TrafficClient`] (`TomTom` incident details). Both go through
//! [`retry::send_json`].
//!
//! The alert, infrastructure and transit feeds are fixed data sets stamped
//! relative to the time they are requested.

pub mod air_quality;
pub mod alerts;
pub mod retry;
pub mod traffic;
pub mod transit;

use thiserror::Error;

pub use air_quality::{AirQualityClient, ObservedAirQuality};
pub use alerts::{
    AlertFeed, EnvironmentalAlert, EnvironmentalLevel, InfrastructureStatus, InfrastructureUpdate,
    TrafficAlert, TrafficSeverity, environmental_alerts, infrastructure_updates, traffic_alerts,
};
pub use traffic::{TrafficClient, TrafficIncident};
pub use transit::{BusDeparture, MetroDeparture, TransitSchedule, transit_schedule};

/// Errors that can occur while fetching a live feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The feed answered with a non-success status.
    #[error("Upstream returned HTTP {status}: {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body preview.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// Reads a required API key from the environment.
fn required_env(name: &str) -> Result<String, FeedError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| FeedError::Config {
            message: format!("{name} environment variable not set"),
        })
}
