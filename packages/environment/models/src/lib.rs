#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geospatial and air-quality types for the `ClearPath` dashboards.
//!
//! These are the shapes produced by the mock generator and the live feed
//! clients and served verbatim by the API. Every value here is ephemeral:
//! zones and readings are recomputed on each request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84-like coordinate in degrees.
///
/// No range validation is performed; callers may pass any finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Congestion level of a simulated traffic zone.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrafficLevel {
    /// Stop-and-go traffic.
    Heavy,
    /// Slowed but flowing.
    Moderate,
    /// Free flow.
    Light,
}

impl TrafficLevel {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Heavy, Self::Moderate, Self::Light]
    }
}

/// A simulated traffic reading at a generated coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficZone {
    /// Where the reading was taken.
    pub coordinates: GeoPoint,
    /// Congestion intensity, 0-99.
    pub intensity: u8,
    /// Congestion level.
    pub level: TrafficLevel,
}

/// Pollutant concentrations attached to a pollution zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePollutants {
    /// Fine particulate matter, µg/m³.
    pub pm25: u16,
    /// Coarse particulate matter, µg/m³.
    pub pm10: u16,
    /// Nitrogen dioxide, ppb.
    pub no2: u16,
    /// Sulfur dioxide, ppb.
    pub so2: u16,
    /// Carbon monoxide, ppm.
    pub co: u16,
}

/// A simulated pollution reading at a generated coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutionZone {
    /// Where the reading was taken.
    pub coordinates: GeoPoint,
    /// Air quality index, 0-299.
    pub aqi: u16,
    /// Individual pollutant levels. Not correlated with `aqi`.
    pub pollutants: ZonePollutants,
}

/// The six pollutant concentrations carried by an [`AqiReading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirPollutants {
    /// Fine particulate matter, µg/m³.
    pub pm25: u16,
    /// Coarse particulate matter, µg/m³.
    pub pm10: u16,
    /// Nitrogen dioxide, ppb.
    pub no2: u16,
    /// Sulfur dioxide, ppb.
    pub so2: u16,
    /// Carbon monoxide, ppm.
    pub co: u16,
    /// Ozone, ppb.
    pub o3: u16,
}

/// Whether a reading is a live snapshot or a forecast.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReadingStatus {
    /// Live snapshot.
    RealTime,
    /// Predicted value.
    Forecast,
}

/// A city-wide air quality snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AqiReading {
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Aggregate AQI, 0-299.
    pub value: u16,
    /// Individual pollutant levels. Not correlated with `value`.
    pub pollutants: AirPollutants,
    /// Snapshot kind.
    pub status: ReadingStatus,
    /// Advice shown next to the reading.
    pub recommendations: Vec<String>,
}

/// Display band for an AQI value.
///
/// Thresholds are inclusive upper bounds: 50, 100, 150, 200.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AqiBand {
    /// 0-50.
    Good,
    /// 51-100.
    Moderate,
    /// 101-150.
    UnhealthyForSensitiveGroups,
    /// 151-200.
    Unhealthy,
    /// Above 200.
    Hazardous,
}

impl AqiBand {
    /// Classifies an AQI value.
    #[must_use]
    pub const fn from_value(aqi: u16) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthyForSensitiveGroups,
            151..=200 => Self::Unhealthy,
            _ => Self::Hazardous,
        }
    }

    /// Map fill color for this band.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "#10B981",
            Self::Moderate => "#F59E0B",
            Self::UnhealthyForSensitiveGroups => "#F97316",
            Self::Unhealthy => "#EF4444",
            Self::Hazardous => "#7F1D1D",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}
