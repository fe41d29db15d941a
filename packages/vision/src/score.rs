//! Lexical overlap between a claimed issue and detected image labels.
//!
//! The reference phrase is split on whitespace. A keyword counts as
//! matched when any label contains it as a substring, ignoring case.
//! Confidence is the matched share of keywords as a percentage.

/// Minimum confidence for a report to be accepted.
pub const ACCEPT_THRESHOLD: f64 = 50.0;

/// Outcome of comparing a reference phrase against labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    /// Lowercase keywords taken from the reference phrase.
    pub keywords: Vec<String>,
    /// Keywords found in at least one label.
    pub matched: Vec<String>,
    /// `matched / keywords * 100`, clamped to `[0, 100]`. Zero when there
    /// are no keywords.
    pub confidence: f64,
}

impl LabelScore {
    /// Scores `reference` against `labels`.
    #[must_use]
    pub fn compute<S: AsRef<str>>(reference: &str, labels: &[S]) -> Self {
        let keywords: Vec<String> = reference.split_whitespace().map(str::to_lowercase).collect();

        if keywords.is_empty() {
            return Self {
                keywords,
                matched: Vec::new(),
                confidence: 0.0,
            };
        }

        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_lowercase()).collect();

        let matched: Vec<String> = keywords
            .iter()
            .filter(|keyword| labels.iter().any(|label| label.contains(keyword.as_str())))
            .cloned()
            .collect();

        #[allow(clippy::cast_precision_loss)]
        let confidence = (matched.len() as f64 / keywords.len() as f64 * 100.0).clamp(0.0, 100.0);

        Self {
            keywords,
            matched,
            confidence,
        }
    }

    /// Whether this score clears [`ACCEPT_THRESHOLD`].
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        is_accepted(self.confidence)
    }
}

/// Confidence in `[0, 100]` that `labels` depict `reference`.
#[must_use]
pub fn confidence<S: AsRef<str>>(reference: &str, labels: &[S]) -> f64 {
    LabelScore::compute(reference, labels).confidence
}

/// `confidence >= 50`.
#[must_use]
pub fn is_accepted(confidence: f64) -> bool {
    confidence >= ACCEPT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_of_keywords_matched() {
        let score = confidence("traffic congestion", &["traffic", "road", "car"]);
        assert!((score - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn substring_match_counts() {
        let score = confidence("pothole", &["pothole damage"]);
        assert!((score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_reference_scores_zero() {
        let score = confidence("", &["road"]);
        assert!(!score.is_nan());
        assert!(score.abs() < f64::EPSILON);

        let blank = confidence("   \t ", &["road"]);
        assert!(blank.abs() < f64::EPSILON);
    }

    #[test]
    fn no_labels_scores_zero() {
        let labels: [&str; 0] = [];
        assert!(confidence("pothole", &labels).abs() < f64::EPSILON);
    }

    #[test]
    fn case_is_ignored_on_both_sides() {
        let score = confidence("Faulty Street Light", &["STREET LAMP", "light fixture"]);
        // "street" and "light" match, "faulty" does not.
        assert!((score - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_matches_stay_clamped() {
        let score = confidence(
            "road road",
            &["road", "road surface", "roadway", "dirt road"],
        );
        assert!((score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn matched_keywords_are_reported() {
        let score = LabelScore::compute("illegal dumping", &["garbage", "dumping ground"]);
        assert_eq!(score.keywords, ["illegal", "dumping"]);
        assert_eq!(score.matched, ["dumping"]);
        assert!(score.is_accepted());
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(is_accepted(50.0));
        assert!(!is_accepted(49.999));
        assert!(is_accepted(100.0));
        assert!(!is_accepted(0.0));
    }
}
