//! Community leaderboard built from accepted submissions.

use std::collections::BTreeMap;

use clearpath_reports_models::{LeaderboardEntry, Submission};

/// Name used for submissions without a reporter.
pub const ANONYMOUS_REPORTER: &str = "Anonymous";

/// Ranks reporters by total points, highest first. Ties are broken by name
/// so the order is stable.
#[must_use]
pub fn leaderboard(submissions: &[Submission]) -> Vec<LeaderboardEntry> {
    let mut totals: BTreeMap<&str, (u64, u32)> = BTreeMap::new();

    for submission in submissions {
        let name = submission
            .reporter
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS_REPORTER);
        let entry = totals.entry(name).or_default();
        entry.0 += u64::from(submission.points);
        entry.1 += 1;
    }

    let mut rows: Vec<(&str, u64, u32)> = totals
        .into_iter()
        .map(|(name, (points, count))| (name, points, count))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    rows.into_iter()
        .zip(1u32..)
        .map(|((name, points, contribution_count), rank)| LeaderboardEntry {
            name: name.to_string(),
            points,
            rank,
            contribution_count,
        })
        .collect()
}
