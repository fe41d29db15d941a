//! Sponsored rewards reporters can spend points on.
//!
//! The catalog is fixed. Expiry dates are offsets from the day passed in,
//! so every listed reward is claimable.

use chrono::{Days, NaiveDate};
use clearpath_reports_models::{Reward, Sponsor};

/// `(id, title, description, points_cost, sponsor, sponsor_logo, days_valid)`
const CATALOG: &[(&str, &str, &str, u32, &str, &str, u64)] = &[
    (
        "city-cafe-discount",
        "City Cafe Discount",
        "20% off on your next purchase",
        200,
        "City Cafe",
        "https://images.unsplash.com/photo-1509042239860-f550ce710b93?w=64&h=64&fit=crop",
        30,
    ),
    (
        "bus-pass",
        "Bus Pass",
        "Free 1-day bus pass",
        500,
        "City Transit",
        "https://images.unsplash.com/photo-1570125909232-eb263c188f7e?w=64&h=64&fit=crop",
        90,
    ),
];

/// The reward catalog, cheapest first.
#[must_use]
pub fn rewards(today: NaiveDate) -> Vec<Reward> {
    CATALOG
        .iter()
        .map(
            |&(id, title, description, points_cost, sponsor, logo, days_valid)| Reward {
                id: id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                points_cost,
                sponsor: Sponsor {
                    name: sponsor.to_string(),
                    logo: logo.to_string(),
                },
                valid_until: today
                    .checked_add_days(Days::new(days_valid))
                    .unwrap_or(NaiveDate::MAX),
            },
        )
        .collect()
}

/// Rewards `points` is enough to claim.
#[must_use]
pub fn affordable(catalog: &[Reward], points: u64) -> Vec<&Reward> {
    catalog.iter().filter(|r| r.is_affordable(points)).collect()
}
