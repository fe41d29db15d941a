#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the `ClearPath` server.
//!
//! Dashboard payloads (zones, readings, alerts) are served as their domain
//! types; only the shapes that differ from the domain live here.

use clearpath_environment_models::{AqiBand, AqiReading, GeoPoint};
use clearpath_reports_models::{IssueType, Submission};
use serde::{Deserialize, Serialize};

/// Map center used when a request omits coordinates.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(51.505, -0.09);

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is up.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// What went wrong, for display.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `?lat=&lng=` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    /// Latitude of the map center.
    pub lat: Option<f64>,
    /// Longitude of the map center.
    pub lng: Option<f64>,
}

impl LocationQuery {
    /// The requested point, or [`DEFAULT_CENTER`] unless both coordinates
    /// are given.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng),
            _ => DEFAULT_CENTER,
        }
    }
}

/// `?limit=` for the recent reports endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecentQuery {
    /// Maximum number of submissions.
    pub limit: Option<usize>,
}

/// `?reporter=&limit=` for the profile endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileQuery {
    /// Reporter to summarize; every submission when absent.
    pub reporter: Option<String>,
    /// Maximum number of recent submissions.
    pub limit: Option<usize>,
}

/// A simulated AQI reading with its display band.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAqiReading {
    /// The reading.
    #[serde(flatten)]
    pub reading: AqiReading,
    /// Band of `value`.
    pub band: AqiBand,
    /// Band label.
    pub band_label: String,
    /// Band map color.
    pub color: String,
}

impl From<AqiReading> for ApiAqiReading {
    fn from(reading: AqiReading) -> Self {
        let band = AqiBand::from_value(reading.value);
        Self {
            reading,
            band,
            band_label: band.label().to_string(),
            color: band.color().to_string(),
        }
    }
}

/// Where a report was made, as sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportLocationInput {
    /// A device fix.
    Coordinates {
        /// Latitude.
        lat: f64,
        /// Longitude.
        lng: f64,
    },
    /// A typed address or landmark.
    Address(String),
}

/// `POST /api/reports` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Claimed issue.
    pub issue_type: IssueType,
    /// Free text; required for `OTHER`.
    #[serde(default)]
    pub description: String,
    /// Display name for the leaderboard.
    #[serde(default)]
    pub reporter: Option<String>,
    /// Base64-encoded photo.
    pub image: String,
    /// MIME type of `image`. Defaults to `image/jpeg`.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Where the photo was taken.
    #[serde(default)]
    pub location: Option<ReportLocationInput>,
}

/// `POST /api/reports` response for a scored report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Whether the report cleared the label-match gate.
    pub accepted: bool,
    /// Match confidence, 0-100.
    pub confidence: f64,
    /// Keywords found in the photo's labels.
    pub matched: Vec<String>,
    /// Message for the reporter.
    pub message: String,
    /// The saved submission, when accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}
