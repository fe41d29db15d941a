//! Random traffic and pollution zones around a center coordinate.

use clearpath_environment_models::{
    GeoPoint, PollutionZone, TrafficLevel, TrafficZone, ZonePollutants,
};
use rand::Rng;

/// Number of zones returned by [`traffic_zones`].
pub const TRAFFIC_ZONE_COUNT: usize = 8;

/// Number of zones returned by [`pollution_zones`].
pub const POLLUTION_ZONE_COUNT: usize = 6;

/// Radius used by the zone generators.
pub const DEFAULT_RADIUS_KM: f64 = 2.0;

/// Flat-earth conversion used for offsets: 1 km is treated as 0.009° of
/// both latitude and longitude at every latitude.
pub const DEGREES_PER_KM: f64 = 0.009;

/// First draw above this is [`TrafficLevel::Heavy`] (p = 0.3).
const HEAVY_CUTOFF: f64 = 0.7;

/// Second draw above this is [`TrafficLevel::Moderate`] (p = 0.6 of the rest).
const MODERATE_CUTOFF: f64 = 0.4;

/// Returns a point offset from `center` by a uniform random amount in
/// `[-radius_km * 0.009, radius_km * 0.009)` degrees on each axis.
///
/// A non-positive or non-finite radius returns `center` unchanged.
pub fn random_point_near<R: Rng + ?Sized>(
    rng: &mut R,
    center: GeoPoint,
    radius_km: f64,
) -> GeoPoint {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return center;
    }

    let span = radius_km * DEGREES_PER_KM * 2.0;
    let lat = (rng.r#gen::<f64>() - 0.5).mul_add(span, center.latitude);
    let lng = (rng.r#gen::<f64>() - 0.5).mul_add(span, center.longitude);

    GeoPoint::new(lat, lng)
}

/// Generates [`TRAFFIC_ZONE_COUNT`] traffic zones within
/// [`DEFAULT_RADIUS_KM`] of `center`.
pub fn traffic_zones<R: Rng + ?Sized>(rng: &mut R, center: GeoPoint) -> Vec<TrafficZone> {
    (0..TRAFFIC_ZONE_COUNT)
        .map(|_| {
            let coordinates = random_point_near(rng, center, DEFAULT_RADIUS_KM);
            let intensity = rng.gen_range(0..100u8);
            let level = draw_traffic_level(rng);
            TrafficZone {
                coordinates,
                intensity,
                level,
            }
        })
        .collect()
}

/// Generates [`POLLUTION_ZONE_COUNT`] pollution zones within
/// [`DEFAULT_RADIUS_KM`] of `center`.
pub fn pollution_zones<R: Rng + ?Sized>(rng: &mut R, center: GeoPoint) -> Vec<PollutionZone> {
    (0..POLLUTION_ZONE_COUNT)
        .map(|_| PollutionZone {
            coordinates: random_point_near(rng, center, DEFAULT_RADIUS_KM),
            aqi: rng.gen_range(0..300),
            pollutants: ZonePollutants {
                pm25: rng.gen_range(0..100),
                pm10: rng.gen_range(0..150),
                no2: rng.gen_range(0..100),
                so2: rng.gen_range(0..50),
                co: rng.gen_range(0..10),
            },
        })
        .collect()
}

// Two sequential draws; the second only happens when the first misses.
fn draw_traffic_level<R: Rng + ?Sized>(rng: &mut R) -> TrafficLevel {
    if rng.r#gen::<f64>() > HEAVY_CUTOFF {
        TrafficLevel::Heavy
    } else if rng.r#gen::<f64>() > MODERATE_CUTOFF {
        TrafficLevel::Moderate
    } else {
        TrafficLevel::Light
    }
}
