//! Fixed alert and infrastructure feeds.
//!
//! Each entry carries an age rather than a timestamp; timestamps are
//! computed from the `now` passed in, so the feed always looks recent.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity of a traffic alert.
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
pub enum TrafficSeverity {
    /// Minor or clearing.
    Low,
    /// Noticeable delays.
    Medium,
    /// Major delays.
    High,
}

/// Level of an environmental alert.
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
pub enum EnvironmentalLevel {
    /// Improving or normal.
    Low,
    /// Elevated.
    Moderate,
    /// Unhealthy.
    High,
    /// Take protective action.
    Severe,
}

/// Progress of an infrastructure project.
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
pub enum InfrastructureStatus {
    /// Not started.
    Scheduled,
    /// Work underway.
    InProgress,
    /// Done.
    Completed,
}

/// A traffic alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficAlert {
    /// Identifier, unique within the feed.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Where it applies.
    pub location: String,
    /// Severity.
    pub severity: TrafficSeverity,
    /// When it was raised.
    pub timestamp: DateTime<Utc>,
    /// Details.
    pub description: String,
}

/// An environmental alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalAlert {
    /// Identifier, unique within the feed.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Where it applies.
    pub location: String,
    /// Level.
    pub level: EnvironmentalLevel,
    /// When it was raised.
    pub timestamp: DateTime<Utc>,
    /// Details.
    pub description: String,
}

/// An infrastructure project update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureUpdate {
    /// Identifier, unique within the feed.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Where the work is.
    pub location: String,
    /// Progress.
    pub status: InfrastructureStatus,
    /// When it was posted.
    pub timestamp: DateTime<Utc>,
    /// Details.
    pub description: String,
    /// Planned completion date.
    pub estimated_completion: NaiveDate,
}

/// The static feeds served under `/api/alerts/{feed}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AlertFeed {
    /// [`traffic_alerts`].
    Traffic,
    /// [`environmental_alerts`].
    Environmental,
    /// [`infrastructure_updates`].
    Infrastructure,
}

impl AlertFeed {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Traffic, Self::Environmental, Self::Infrastructure]
    }
}

// (title, location, severity, minutes ago, description)
const TRAFFIC: &[(&str, &str, TrafficSeverity, i64, &str)] = &[
    (
        "Heavy Traffic Congestion",
        "Downtown Main Street",
        TrafficSeverity::High,
        15,
        "Major delays due to multiple lane closures",
    ),
    (
        "Road Construction",
        "West Boulevard",
        TrafficSeverity::Medium,
        30,
        "Single lane operation causing moderate delays",
    ),
    (
        "Accident Cleared",
        "Highway 101 North",
        TrafficSeverity::Low,
        45,
        "All lanes now open, residual delays expected",
    ),
    (
        "Special Event Traffic",
        "Convention Center",
        TrafficSeverity::Medium,
        60,
        "Increased traffic due to ongoing convention",
    ),
    (
        "Bridge Maintenance",
        "River Bridge",
        TrafficSeverity::Medium,
        90,
        "Periodic closures for routine maintenance",
    ),
    (
        "Weather Impact",
        "Coastal Highway",
        TrafficSeverity::High,
        120,
        "Heavy rain causing reduced visibility and slower traffic",
    ),
];

const ENVIRONMENTAL: &[(&str, &str, EnvironmentalLevel, i64, &str)] = &[
    (
        "Poor Air Quality Warning",
        "Industrial District",
        EnvironmentalLevel::Severe,
        20,
        "High levels of PM2.5 detected. Wear masks recommended.",
    ),
    (
        "Ozone Alert",
        "City Center",
        EnvironmentalLevel::Moderate,
        40,
        "Elevated ozone levels during peak hours.",
    ),
    (
        "Smoke Advisory",
        "North District",
        EnvironmentalLevel::High,
        60,
        "Reduced visibility due to industrial activity.",
    ),
    (
        "Air Quality Improvement",
        "South District",
        EnvironmentalLevel::Low,
        80,
        "Air quality returning to normal levels.",
    ),
    (
        "Dust Storm Warning",
        "East District",
        EnvironmentalLevel::High,
        100,
        "High winds causing elevated particle levels.",
    ),
];

// (title, location, status, minutes ago, description, (y, m, d))
const INFRASTRUCTURE: &[(&str, &str, InfrastructureStatus, i64, &str, (i32, u32, u32))] = &[
    (
        "Road Resurfacing",
        "Oak Street",
        InfrastructureStatus::InProgress,
        30,
        "Ongoing road maintenance work.",
        (2024, 2, 25),
    ),
    (
        "Traffic Light Installation",
        "Maple Avenue",
        InfrastructureStatus::Scheduled,
        50,
        "New traffic signal installation.",
        (2024, 3, 1),
    ),
    (
        "Bridge Inspection",
        "River Bridge",
        InfrastructureStatus::Completed,
        70,
        "Routine structural inspection completed.",
        (2024, 2, 20),
    ),
    (
        "Sidewalk Repairs",
        "Downtown Area",
        InfrastructureStatus::InProgress,
        90,
        "Ongoing pedestrian infrastructure improvements.",
        (2024, 3, 15),
    ),
];

/// Current traffic alerts, newest first.
#[must_use]
pub fn traffic_alerts(now: DateTime<Utc>) -> Vec<TrafficAlert> {
    TRAFFIC
        .iter()
        .zip(1u32..)
        .map(
            |(&(title, location, severity, minutes, description), id)| TrafficAlert {
                id: id.to_string(),
                title: title.to_string(),
                location: location.to_string(),
                severity,
                timestamp: now - Duration::minutes(minutes),
                description: description.to_string(),
            },
        )
        .collect()
}

/// Current environmental alerts, newest first.
#[must_use]
pub fn environmental_alerts(now: DateTime<Utc>) -> Vec<EnvironmentalAlert> {
    ENVIRONMENTAL
        .iter()
        .zip(1u32..)
        .map(
            |(&(title, location, level, minutes, description), id)| EnvironmentalAlert {
                id: id.to_string(),
                title: title.to_string(),
                location: location.to_string(),
                level,
                timestamp: now - Duration::minutes(minutes),
                description: description.to_string(),
            },
        )
        .collect()
}

/// Current infrastructure updates, newest first.
///
/// Entries whose completion date does not form a valid calendar date are
/// skipped.
#[must_use]
pub fn infrastructure_updates(now: DateTime<Utc>) -> Vec<InfrastructureUpdate> {
    INFRASTRUCTURE
        .iter()
        .zip(1u32..)
        .filter_map(
            |(&(title, location, status, minutes, description, (y, m, d)), id)| {
                Some(InfrastructureUpdate {
                    id: id.to_string(),
                    title: title.to_string(),
                    location: location.to_string(),
                    status,
                    timestamp: now - Duration::minutes(minutes),
                    description: description.to_string(),
                    estimated_completion: NaiveDate::from_ymd_opt(y, m, d)?,
                })
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn traffic_alerts_are_stamped_relative_to_now() {
        let alerts = traffic_alerts(now());
        assert_eq!(alerts.len(), 6);
        assert_eq!(alerts[0].title, "Heavy Traffic Congestion");
        assert_eq!(alerts[0].severity, TrafficSeverity::High);
        assert_eq!(alerts[0].timestamp, now() - Duration::minutes(15));
        assert_eq!(alerts[5].timestamp, now() - Duration::hours(2));
    }

    #[test]
    fn feeds_are_newest_first_with_unique_ids() {
        let environmental = environmental_alerts(now());
        assert!(
            environmental
                .windows(2)
                .all(|w| w[0].timestamp > w[1].timestamp)
        );
        let ids: HashSet<&str> = environmental.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), environmental.len());

        let traffic = traffic_alerts(now());
        let ids: HashSet<&str> = traffic.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), traffic.len());

        let infrastructure = infrastructure_updates(now());
        let ids: HashSet<&str> = infrastructure.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids.len(), infrastructure.len());
    }

    #[test]
    fn infrastructure_updates_serialize_dates_and_kebab_status() {
        let updates = infrastructure_updates(now());
        assert_eq!(updates.len(), 4);

        let json = serde_json::to_value(&updates[0]).unwrap();
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["estimatedCompletion"], "2024-02-25");
    }

    #[test]
    fn feed_names_parse_case_insensitively() {
        assert_eq!("traffic".parse::<AlertFeed>().unwrap(), AlertFeed::Traffic);
        assert_eq!(
            "Environmental".parse::<AlertFeed>().unwrap(),
            AlertFeed::Environmental
        );
        assert!("weather".parse::<AlertFeed>().is_err());
        assert_eq!(AlertFeed::Infrastructure.to_string(), "infrastructure");
    }
}
