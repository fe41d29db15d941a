//! Live air quality from the `OpenWeatherMap` air pollution API.
//!
//! See <https://openweathermap.org/api/air-pollution>

use chrono::{DateTime, Utc};
use clearpath_environment_models::{AqiBand, GeoPoint};
use serde::{Deserialize, Serialize};

use crate::{FeedError, required_env, retry};

/// Default API root; `/air_pollution` is appended.
pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";

/// Multiplier from the 1-5 index to the dashboard's display scale.
pub const DISPLAY_SCALE: u16 = 50;

/// Pollutant concentrations in μg/m³, as reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedComponents {
    /// Fine particulate matter.
    pub pm25: f64,
    /// Coarse particulate matter.
    pub pm10: f64,
    /// Nitrogen dioxide.
    pub no2: f64,
    /// Ozone.
    pub o3: f64,
    /// Sulfur dioxide.
    pub so2: f64,
    /// Carbon monoxide.
    pub co: f64,
}

/// One live air quality observation.
///
/// Unlike the simulated reading, no recommendations are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedAirQuality {
    /// When the provider measured it.
    pub observed_at: DateTime<Utc>,
    /// Provider index, 1 (good) to 5 (very poor).
    pub index: u8,
    /// `index * 50`, comparable to the simulated AQI value.
    pub display_value: u16,
    /// Band of `display_value`.
    pub band: AqiBand,
    /// Pollutant concentrations.
    pub components: ObservedComponents,
}

/// Client for the air pollution endpoint.
#[derive(Debug, Clone)]
pub struct AirQualityClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AirQualityClient {
    /// Creates a client with the default base URL.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Creates a client from `OPENWEATHER_API_KEY` and the optional
    /// `OPENWEATHER_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if the API key is not set.
    pub fn from_env() -> Result<Self, FeedError> {
        let mut client = Self::new(required_env("OPENWEATHER_API_KEY")?);
        if let Ok(base_url) = std::env::var("OPENWEATHER_BASE_URL") {
            client = client.with_base_url(base_url);
        }
        Ok(client)
    }

    /// Fetches the current observation at `point`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the request fails or the response has no
    /// usable observation.
    pub async fn observe(&self, point: GeoPoint) -> Result<ObservedAirQuality, FeedError> {
        let url = format!("{}/air_pollution", self.base_url);
        let lat = point.latitude.to_string();
        let lon = point.longitude.to_string();

        log::debug!("Fetching air quality at {point}");
        let body = retry::send_json(|| {
            self.client.get(&url).query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
            ])
        })
        .await?;

        parse_response(&body)
    }
}

/// Parses an `air_pollution` response, taking the first entry of `list`.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if `list` is empty or a field is missing.
pub fn parse_response(body: &serde_json::Value) -> Result<ObservedAirQuality, FeedError> {
    let first = body["list"]
        .as_array()
        .and_then(|list| list.first())
        .ok_or_else(|| FeedError::Parse {
            message: "air_pollution response has no observations".to_string(),
        })?;

    let index = first["main"]["aqi"]
        .as_u64()
        .and_then(|v| u8::try_from(v).ok())
        .filter(|v| (1..=5).contains(v))
        .ok_or_else(|| FeedError::Parse {
            message: format!("Invalid aqi index: {}", first["main"]["aqi"]),
        })?;

    let observed_at = first["dt"]
        .as_i64()
        .and_then(|dt| DateTime::from_timestamp(dt, 0))
        .ok_or_else(|| FeedError::Parse {
            message: "Missing dt in air_pollution response".to_string(),
        })?;

    let c = &first["components"];
    let component = |name: &str| {
        c[name].as_f64().ok_or_else(|| FeedError::Parse {
            message: format!("Missing component {name} in air_pollution response"),
        })
    };

    let components = ObservedComponents {
        pm25: component("pm2_5")?,
        pm10: component("pm10")?,
        no2: component("no2")?,
        o3: component("o3")?,
        so2: component("so2")?,
        co: component("co")?,
    };

    let display_value = u16::from(index) * DISPLAY_SCALE;

    Ok(ObservedAirQuality {
        observed_at,
        index,
        display_value,
        band: AqiBand::from_value(display_value),
        components,
    })
}
