//! Live traffic incidents from the `TomTom` Traffic API.
//!
//! See <https://developer.tomtom.com/traffic-api/documentation/traffic-incidents/incident-details>

use clearpath_environment_models::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::{FeedError, required_env, retry};

/// Default API root; `/incidentDetails` is appended.
pub const DEFAULT_BASE_URL: &str = "https://api.tomtom.com/traffic/services/5";

/// Half-width of the query box around the requested point, in degrees.
pub const BBOX_HALF_SPAN_DEG: f64 = 0.1;

const INCIDENT_FIELDS: &str = "{incidents{type,geometry{type,coordinates},properties{id,iconCategory,magnitudeOfDelay,events{description},from,to,delay}}}";

/// A reported traffic incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficIncident {
    /// Provider identifier.
    pub id: String,
    /// Provider icon category (accident, jam, road works, ...).
    pub icon_category: u8,
    /// Magnitude of delay, 0 (unknown) to 4 (road closed).
    pub magnitude: u8,
    /// Event descriptions joined with `"; "`.
    pub description: String,
    /// Start of the affected stretch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// End of the affected stretch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Delay caused, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<u32>,
    /// First point of the incident geometry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

/// Client for the incident details endpoint.
#[derive(Debug, Clone)]
pub struct TrafficClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TrafficClient {
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

    /// Creates a client from `TOMTOM_API_KEY` and the optional
    /// `TOMTOM_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if the API key is not set.
    pub fn from_env() -> Result<Self, FeedError> {
        let mut client = Self::new(required_env("TOMTOM_API_KEY")?);
        if let Ok(base_url) = std::env::var("TOMTOM_BASE_URL") {
            client = client.with_base_url(base_url);
        }
        Ok(client)
    }

    /// Fetches incidents in the box around `point`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the request fails or the response is not an
    /// incident collection.
    pub async fn incidents(&self, point: GeoPoint) -> Result<Vec<TrafficIncident>, FeedError> {
        let url = format!("{}/incidentDetails", self.base_url);
        let bbox = bounding_box(point);

        log::debug!("Fetching traffic incidents in bbox {bbox}");
        let body = retry::send_json(|| {
            self.client.get(&url).query(&[
                ("key", self.api_key.as_str()),
                ("bbox", bbox.as_str()),
                ("fields", INCIDENT_FIELDS),
            ])
        })
        .await?;

        let incidents = parse_response(&body)?;
        log::debug!("{} traffic incidents near {point}", incidents.len());
        Ok(incidents)
    }
}

/// `minLon,minLat,maxLon,maxLat` around `point`.
#[must_use]
pub fn bounding_box(point: GeoPoint) -> String {
    format!(
        "{},{},{},{}",
        point.longitude - BBOX_HALF_SPAN_DEG,
        point.latitude - BBOX_HALF_SPAN_DEG,
        point.longitude + BBOX_HALF_SPAN_DEG,
        point.latitude + BBOX_HALF_SPAN_DEG
    )
}

/// Parses an `incidentDetails` response.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if `incidents` is missing or an incident
/// has no id.
pub fn parse_response(body: &serde_json::Value) -> Result<Vec<TrafficIncident>, FeedError> {
    let incidents = body["incidents"]
        .as_array()
        .ok_or_else(|| FeedError::Parse {
            message: "incidentDetails response has no incidents array".to_string(),
        })?;

    incidents.iter().map(parse_incident).collect()
}

fn parse_incident(incident: &serde_json::Value) -> Result<TrafficIncident, FeedError> {
    let props = &incident["properties"];

    let id = props["id"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| FeedError::Parse {
            message: "Incident without id".to_string(),
        })?;

    let small = |v: &serde_json::Value| v.as_u64().and_then(|n| u8::try_from(n).ok()).unwrap_or(0);

    let description = props["events"]
        .as_array()
        .map(|events| {
            events
                .iter()
                .filter_map(|e| e["description"].as_str())
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_default();

    Ok(TrafficIncident {
        id,
        icon_category: small(&props["iconCategory"]),
        magnitude: small(&props["magnitudeOfDelay"]),
        description,
        from: props["from"].as_str().map(String::from),
        to: props["to"].as_str().map(String::from),
        delay_seconds: props["delay"].as_u64().and_then(|d| u32::try_from(d).ok()),
        location: first_point(&incident["geometry"]),
    })
}

/// First `[lon, lat]` pair of a Point or `LineString` geometry.
fn first_point(geometry: &serde_json::Value) -> Option<GeoPoint> {
    let coords = &geometry["coordinates"];
    let pair = if coords[0].is_array() {
        &coords[0]
    } else {
        coords
    };
    let lon = pair[0].as_f64()?;
    let lat = pair[1].as_f64()?;
    Some(GeoPoint::new(lat, lon))
}
