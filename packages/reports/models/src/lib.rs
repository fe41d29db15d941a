#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Citizen issue report types.
//!
//! A [`ReportDraft`] is what the reporter fills in. Once the photo clears
//! the label-match gate it becomes a [`Submission`], which is the only
//! persisted entity in the system. Submissions are append-only and carry
//! no identity beyond their position in the log. [`Reward`]s and
//! [`ReporterProfile`]s are derived views for the profile page.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kind of issue being reported.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum IssueType {
    /// Congested roads.
    Traffic,
    /// Smoke, dust, odors.
    Pollution,
    /// Damaged public infrastructure.
    Infrastructure,
    /// Roadworks and building sites.
    Construction,
    /// Road surface holes.
    Pothole,
    /// Broken or unlit street lights.
    Streetlight,
    /// Illegally dumped waste.
    Dumping,
    /// Anything else; the description is matched instead of the label.
    Other,
}

impl IssueType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Traffic,
            Self::Pollution,
            Self::Infrastructure,
            Self::Construction,
            Self::Pothole,
            Self::Streetlight,
            Self::Dumping,
            Self::Other,
        ]
    }

    /// Display label shown in the report form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Traffic => "Traffic Congestion",
            Self::Pollution => "Pollution",
            Self::Infrastructure => "Infrastructure",
            Self::Construction => "Construction",
            Self::Pothole => "Pothole",
            Self::Streetlight => "Faulty Street Light",
            Self::Dumping => "Illegal Dumping",
            Self::Other => "Other",
        }
    }

    /// Whether a free-text description must accompany this issue type.
    #[must_use]
    pub const fn requires_description(self) -> bool {
        matches!(self, Self::Other)
    }
}

/// A report as filled in by the citizen, before the photo is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    /// Claimed issue.
    pub issue_type: IssueType,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Display name for the leaderboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
}

impl ReportDraft {
    /// The phrase compared against detected image labels: the description
    /// for [`IssueType::Other`], the issue label otherwise.
    #[must_use]
    pub fn reference_phrase(&self) -> &str {
        if self.issue_type.requires_description() {
            self.description.as_str()
        } else {
            self.issue_type.label()
        }
    }
}

/// An accepted issue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Reported issue.
    pub issue_type: IssueType,
    /// Free-text description.
    pub description: String,
    /// Points awarded.
    pub points: u32,
    /// When the photo was captured.
    pub captured_at: DateTime<Utc>,
    /// Coordinates or address, or a placeholder when no fix was available.
    pub location: String,
    /// Standard base64 photo.
    pub image: String,
    /// Display name for the leaderboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
}

/// A ranked row of the community leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Reporter display name.
    pub name: String,
    /// Total points across accepted reports.
    pub points: u64,
    /// 1-based rank.
    pub rank: u32,
    /// Number of accepted reports.
    pub contribution_count: u32,
}

/// Business funding a reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    /// Display name.
    pub name: String,
    /// Logo image URL.
    pub logo: String,
}

/// A perk reporters can spend points on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    /// Stable identifier.
    pub id: String,
    /// Short title, e.g. "Bus Pass".
    pub title: String,
    /// What the reporter gets.
    pub description: String,
    /// Points needed to claim.
    pub points_cost: u32,
    /// Who provides it.
    pub sponsor: Sponsor,
    /// Last day the reward can be claimed.
    pub valid_until: NaiveDate,
}

impl Reward {
    /// Whether `points` covers the cost.
    #[must_use]
    pub fn is_affordable(&self, points: u64) -> bool {
        points >= u64::from(self.points_cost)
    }
}

/// Points and recent activity for one reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterProfile {
    /// Reporter the totals cover; `None` covers every submission.
    pub reporter: Option<String>,
    /// Points across accepted reports.
    pub total_points: u64,
    /// Number of accepted reports.
    pub report_count: u32,
    /// Newest submissions first.
    pub recent: Vec<Submission>,
}
