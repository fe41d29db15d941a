#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Mock data generator for the traffic map, pollution map and AQI card.
//!
//! Every function takes the random source as a parameter so output is
//! reproducible under a seeded [`rand::rngs::StdRng`]. All numeric fields
//! are drawn independently and uniformly: no correlation is modeled
//! between, e.g., a zone's AQI and its pollutant levels.
//!
//! [`Simulator`] bundles an owned RNG for callers (the server, the CLI)
//! that want to hold one generator across many requests.

pub mod aqi;
pub mod zones;

use chrono::{DateTime, Utc};
use clearpath_environment_models::{AqiReading, GeoPoint, PollutionZone, TrafficZone};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub use aqi::{AQI_RECOMMENDATIONS, current_aqi_reading};
pub use zones::{
    DEFAULT_RADIUS_KM, DEGREES_PER_KM, POLLUTION_ZONE_COUNT, TRAFFIC_ZONE_COUNT, pollution_zones,
    random_point_near, traffic_zones,
};

/// A mock data generator that owns its random source.
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    /// Creates a generator seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a generator with a fixed seed. Two generators with the same
    /// seed produce identical sequences.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        log::debug!("Seeding simulator with {seed}");
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// See [`zones::traffic_zones`].
    pub fn traffic_zones(&mut self, center: GeoPoint) -> Vec<TrafficZone> {
        traffic_zones(&mut self.rng, center)
    }

    /// See [`zones::pollution_zones`].
    pub fn pollution_zones(&mut self, center: GeoPoint) -> Vec<PollutionZone> {
        pollution_zones(&mut self.rng, center)
    }

    /// See [`aqi::current_aqi_reading`].
    pub fn aqi_reading(&mut self, now: DateTime<Utc>) -> AqiReading {
        current_aqi_reading(&mut self.rng, now)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
