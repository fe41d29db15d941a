//! Per-reporter totals for the profile page.

use clearpath_reports_models::{ReporterProfile, Submission};

use crate::leaderboard::ANONYMOUS_REPORTER;

/// Totals and newest `recent_limit` submissions for `reporter`.
///
/// `None` summarizes every submission. Names are compared after trimming,
/// and [`ANONYMOUS_REPORTER`] selects submissions without a reporter, the
/// same grouping the leaderboard uses.
#[must_use]
pub fn profile(
    submissions: &[Submission],
    reporter: Option<&str>,
    recent_limit: usize,
) -> ReporterProfile {
    let reporter = reporter.map(str::trim).filter(|r| !r.is_empty());

    let mut mine: Vec<&Submission> = submissions
        .iter()
        .filter(|s| reporter.is_none_or(|name| display_name(s) == name))
        .collect();

    let total_points = mine.iter().map(|s| u64::from(s.points)).sum();
    let report_count = u32::try_from(mine.len()).unwrap_or(u32::MAX);

    mine.sort_by_key(|s| s.captured_at);
    let recent = mine
        .into_iter()
        .rev()
        .take(recent_limit)
        .cloned()
        .collect();

    ReporterProfile {
        reporter: reporter.map(ToString::to_string),
        total_points,
        report_count,
        recent,
    }
}

fn display_name(submission: &Submission) -> &str {
    submission
        .reporter
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(ANONYMOUS_REPORTER)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use clearpath_reports_models::IssueType;

    use super::*;

    fn by(reporter: Option<&str>, issue_type: IssueType, minutes: i64) -> Submission {
        Submission {
            issue_type,
            description: String::new(),
            points: 50,
            captured_at: Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap()
                + Duration::minutes(minutes),
            location: String::new(),
            image: String::new(),
            reporter: reporter.map(ToString::to_string),
        }
    }

    fn log() -> Vec<Submission> {
        vec![
            by(Some("Ana"), IssueType::Pothole, 0),
            by(Some("Ben"), IssueType::Dumping, 5),
            by(Some(" Ana "), IssueType::Streetlight, 30),
            by(None, IssueType::Traffic, 40),
            by(Some("Ana"), IssueType::Construction, 10),
        ]
    }

    #[test]
    fn totals_cover_only_the_named_reporter() {
        let ana = profile(&log(), Some("Ana"), 2);

        assert_eq!(ana.reporter.as_deref(), Some("Ana"));
        assert_eq!(ana.total_points, 150);
        assert_eq!(ana.report_count, 3);
        let recent: Vec<IssueType> = ana.recent.iter().map(|s| s.issue_type).collect();
        assert_eq!(recent, [IssueType::Streetlight, IssueType::Construction]);
    }

    #[test]
    fn no_reporter_summarizes_everything() {
        let all = profile(&log(), None, 3);
        assert_eq!(all.reporter, None);
        assert_eq!(all.total_points, 250);
        assert_eq!(all.report_count, 5);
        assert_eq!(all.recent[0].issue_type, IssueType::Traffic);

        assert_eq!(profile(&log(), Some("  "), 3), all);
    }

    #[test]
    fn anonymous_and_unknown_reporters() {
        let anonymous = profile(&log(), Some(ANONYMOUS_REPORTER), 3);
        assert_eq!(anonymous.report_count, 1);
        assert_eq!(anonymous.recent[0].issue_type, IssueType::Traffic);

        let nobody = profile(&log(), Some("Zed"), 3);
        assert_eq!(nobody.total_points, 0);
        assert_eq!(nobody.report_count, 0);
        assert!(nobody.recent.is_empty());
    }
}
