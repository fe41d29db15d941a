//! City-wide mock AQI reading for the dashboard card.

use chrono::{DateTime, Utc};
use clearpath_environment_models::{AirPollutants, AqiReading, ReadingStatus};
use rand::Rng;

/// Advice attached to every generated reading.
///
/// The list is the same regardless of the generated value. The live feed
/// path attaches no recommendations at all; the two are intentionally
/// left distinct.
pub const AQI_RECOMMENDATIONS: [&str; 3] = [
    "Wear masks when outdoors",
    "Limit outdoor activities",
    "Keep windows closed",
];

/// Generates a reading stamped with `now`.
pub fn current_aqi_reading<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> AqiReading {
    AqiReading {
        timestamp: now,
        value: rng.gen_range(0..300),
        pollutants: AirPollutants {
            pm25: rng.gen_range(0..100),
            pm10: rng.gen_range(0..150),
            no2: rng.gen_range(0..100),
            so2: rng.gen_range(0..50),
            co: rng.gen_range(0..10),
            o3: rng.gen_range(0..100),
        },
        status: ReadingStatus::RealTime,
        recommendations: AQI_RECOMMENDATIONS.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn reading_fields_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let now = Utc::now();

        for _ in 0..500 {
            let reading = current_aqi_reading(&mut rng, now);
            assert_eq!(reading.timestamp, now);
            assert!(reading.value < 300);
            assert!(reading.pollutants.pm25 < 100);
            assert!(reading.pollutants.pm10 < 150);
            assert!(reading.pollutants.no2 < 100);
            assert!(reading.pollutants.so2 < 50);
            assert!(reading.pollutants.co < 10);
            assert!(reading.pollutants.o3 < 100);
        }
    }

    #[test]
    fn status_and_recommendations_are_fixed() {
        let mut rng = StdRng::seed_from_u64(12);
        let now = Utc::now();

        for _ in 0..50 {
            let reading = current_aqi_reading(&mut rng, now);
            assert_eq!(reading.status, ReadingStatus::RealTime);
            assert_eq!(
                reading.recommendations,
                vec![
                    "Wear masks when outdoors",
                    "Limit outdoor activities",
                    "Keep windows closed",
                ]
            );
        }
    }
}
