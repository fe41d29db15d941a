//! Transit departures board.
//!
//! There is no live transit source yet; the board is a fixed schedule.

use serde::{Deserialize, Serialize};

/// Next departure on a bus route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusDeparture {
    /// Route number, e.g. `101`.
    pub id: String,
    /// Route name.
    pub route: String,
    /// Time until the next arrival, for display.
    pub next_arrival: String,
}

/// Next departure on a metro line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetroDeparture {
    /// Line code, e.g. `M1`.
    pub id: String,
    /// Line name.
    pub line: String,
    /// Time until the next arrival, for display.
    pub next_arrival: String,
}

/// Upcoming bus and metro departures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitSchedule {
    /// Bus routes.
    pub buses: Vec<BusDeparture>,
    /// Metro lines.
    pub metro: Vec<MetroDeparture>,
}

/// `(id, route, next_arrival)`
const BUSES: &[(&str, &str, &str)] = &[
    ("101", "Downtown Express", "5 min"),
    ("102", "Airport Shuttle", "12 min"),
];

/// `(id, line, next_arrival)`
const METRO: &[(&str, &str, &str)] = &[("M1", "Blue Line", "3 min"), ("M2", "Red Line", "7 min")];

/// The current departures board.
#[must_use]
pub fn transit_schedule() -> TransitSchedule {
    TransitSchedule {
        buses: BUSES
            .iter()
            .map(|&(id, route, next_arrival)| BusDeparture {
                id: id.to_string(),
                route: route.to_string(),
                next_arrival: next_arrival.to_string(),
            })
            .collect(),
        metro: METRO
            .iter()
            .map(|&(id, line, next_arrival)| MetroDeparture {
                id: id.to_string(),
                line: line.to_string(),
                next_arrival: next_arrival.to_string(),
            })
            .collect(),
    }
}
