//! The report submission flow.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clearpath_reports_models::{ReportDraft, Submission};
use clearpath_vision::{LabelDetector, LabelScore};

use crate::ReportError;
use crate::providers::{CaptureProvider, LOCATION_PLACEHOLDER, LocationProvider};
use crate::submission_log::SubmissionLog;

/// Points awarded for every accepted report.
pub const ACCEPTED_REPORT_POINTS: u32 = 50;

/// Shown when the photo does not clear the label-match gate.
pub const REJECTION_MESSAGE: &str =
    "The photo does not appear to show the reported issue. Please retake it and try again.";

/// Result of a completed submission attempt.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// The photo matched; the submission was persisted.
    Accepted {
        /// The persisted submission.
        submission: Submission,
        /// How the labels matched.
        score: LabelScore,
    },
    /// The photo did not match; nothing was persisted.
    Rejected {
        /// How the labels matched.
        score: LabelScore,
        /// Message for the reporter.
        message: String,
    },
}

impl SubmissionOutcome {
    /// Label-match result for either outcome.
    #[must_use]
    pub const fn score(&self) -> &LabelScore {
        match self {
            Self::Accepted { score, .. } | Self::Rejected { score, .. } => score,
        }
    }

    /// Whether the report was accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Runs reports through the label-match gate and records accepted ones.
pub struct ReportService {
    detector: Arc<dyn LabelDetector>,
    log: Arc<SubmissionLog>,
}

impl ReportService {
    /// Creates a service using `detector` for recognition and `log` for
    /// persistence.
    #[must_use]
    pub fn new(detector: Arc<dyn LabelDetector>, log: Arc<SubmissionLog>) -> Self {
        Self { detector, log }
    }

    /// The submission log accepted reports are appended to.
    #[must_use]
    pub fn log(&self) -> &SubmissionLog {
        &self.log
    }

    /// Submits `draft`, capturing the photo through `capture` and the
    /// location through `location`.
    ///
    /// # Errors
    ///
    /// * [`ReportError::Validation`] if a required description or the image
    ///   is missing.
    /// * [`ReportError::Device`] if the photo cannot be captured.
    /// * [`ReportError::Recognition`] if label detection fails.
    /// * [`ReportError::Storage`] if an accepted report cannot be saved.
    pub async fn submit(
        &self,
        draft: &ReportDraft,
        capture: &dyn CaptureProvider,
        location: &dyn LocationProvider,
    ) -> Result<SubmissionOutcome, ReportError> {
        self.submit_at(draft, capture, location, Utc::now()).await
    }

    /// [`Self::submit`] with an explicit capture timestamp.
    ///
    /// # Errors
    ///
    /// See [`Self::submit`].
    pub async fn submit_at(
        &self,
        draft: &ReportDraft,
        capture: &dyn CaptureProvider,
        location: &dyn LocationProvider,
        captured_at: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, ReportError> {
        if draft.issue_type.requires_description() && draft.description.trim().is_empty() {
            return Err(ReportError::Validation {
                message: "Please describe the issue before submitting.".to_string(),
            });
        }

        let image = capture.capture().await?;
        if image.is_empty() {
            return Err(ReportError::Validation {
                message: "Please capture an image before submitting.".to_string(),
            });
        }

        let location = match location.locate().await {
            Ok(fix) => fix.to_string(),
            Err(e) => {
                log::warn!("No location for report, using placeholder: {e}");
                LOCATION_PLACEHOLDER.to_string()
            }
        };

        let labels = self.detector.detect(&image).await?;
        let descriptions: Vec<&str> = labels.iter().map(|l| l.description.as_str()).collect();
        let score = LabelScore::compute(draft.reference_phrase(), &descriptions);

        log::info!(
            "Report {} scored {:.1} against {} labels (matched {:?})",
            draft.issue_type,
            score.confidence,
            descriptions.len(),
            score.matched
        );

        if !score.is_accepted() {
            return Ok(SubmissionOutcome::Rejected {
                score,
                message: REJECTION_MESSAGE.to_string(),
            });
        }

        let submission = Submission {
            issue_type: draft.issue_type,
            description: draft.description.trim().to_string(),
            points: ACCEPTED_REPORT_POINTS,
            captured_at,
            location,
            image: image.to_base64(),
            reporter: draft
                .reporter
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(ToString::to_string),
        };

        Arc::clone(&self.log).record(submission.clone()).await?;

        Ok(SubmissionOutcome::Accepted { submission, score })
    }
}

#[cfg(test)]
mod tests {
    use clearpath_environment_models::GeoPoint;
    use clearpath_reports_models::IssueType;
    use clearpath_vision::{CapturedImage, DetectedLabel, FixedLabels, VisionError};

    use super::*;
    use crate::providers::{FixedLocation, NoLocation, ReportLocation, StaticCapture};
    use crate::store::MemoryStore;

    struct FailingDetector;

    #[async_trait::async_trait]
    impl LabelDetector for FailingDetector {
        async fn detect(&self, _image: &CapturedImage) -> Result<Vec<DetectedLabel>, VisionError> {
            Err(VisionError::Provider {
                message: "connection reset".to_string(),
            })
        }
    }

    struct FailingCapture;

    #[async_trait::async_trait]
    impl CaptureProvider for FailingCapture {
        async fn capture(&self) -> Result<CapturedImage, ReportError> {
            Err(ReportError::Device {
                message: "Unable to access camera".to_string(),
            })
        }
    }

    fn service(detector: Arc<dyn LabelDetector>) -> ReportService {
        let log = Arc::new(SubmissionLog::new(Box::new(MemoryStore::new())));
        ReportService::new(detector, log)
    }

    fn photo() -> StaticCapture {
        StaticCapture(CapturedImage::new(vec![1, 2, 3], "image/jpeg"))
    }

    fn here() -> FixedLocation {
        FixedLocation(ReportLocation::Coordinates(GeoPoint::new(51.505, -0.09)))
    }

    fn draft(issue_type: IssueType, description: &str) -> ReportDraft {
        ReportDraft {
            issue_type,
            description: description.to_string(),
            reporter: Some("John Doe".to_string()),
        }
    }

    #[tokio::test]
    async fn pothole_with_matching_labels_is_accepted() {
        let svc = service(Arc::new(FixedLabels::new(&["road", "pothole", "asphalt"])));

        let outcome = svc
            .submit(&draft(IssueType::Pothole, ""), &photo(), &here())
            .await
            .unwrap();

        let SubmissionOutcome::Accepted { submission, score } = outcome else {
            panic!("expected acceptance");
        };
        assert!((score.confidence - 100.0).abs() < f64::EPSILON);
        assert_eq!(submission.points, 50);
        assert_eq!(submission.issue_type, IssueType::Pothole);
        assert_eq!(submission.location, "51.505000, -0.090000");
        assert_eq!(submission.image, "AQID");
        assert_eq!(submission.reporter.as_deref(), Some("John Doe"));

        assert_eq!(svc.log().all().unwrap(), vec![submission]);
    }

    #[tokio::test]
    async fn exactly_half_matched_is_accepted() {
        let svc = service(Arc::new(FixedLabels::new(&["traffic", "road", "car"])));

        let outcome = svc
            .submit(&draft(IssueType::Traffic, ""), &photo(), &here())
            .await
            .unwrap();

        assert!(outcome.is_accepted());
        assert!((outcome.score().confidence - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unrelated_labels_are_rejected_and_not_persisted() {
        let svc = service(Arc::new(FixedLabels::new(&["cat", "sofa"])));

        let outcome = svc
            .submit(&draft(IssueType::Streetlight, ""), &photo(), &here())
            .await
            .unwrap();

        match outcome {
            SubmissionOutcome::Rejected { score, message } => {
                assert!(score.confidence.abs() < f64::EPSILON);
                assert_eq!(message, REJECTION_MESSAGE);
            }
            SubmissionOutcome::Accepted { .. } => panic!("expected rejection"),
        }
        assert!(svc.log().all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_uses_description_as_reference() {
        let svc = service(Arc::new(FixedLabels::new(&["fallen tree", "branch"])));

        let outcome = svc
            .submit(&draft(IssueType::Other, "fallen tree"), &photo(), &here())
            .await
            .unwrap();

        assert!(outcome.is_accepted());
    }

    #[tokio::test]
    async fn other_without_description_fails_validation() {
        let svc = service(Arc::new(FixedLabels::new(&["tree"])));

        let err = svc
            .submit(&draft(IssueType::Other, "   "), &photo(), &here())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::Validation { .. }));
    }

    #[tokio::test]
    async fn empty_image_fails_validation() {
        let svc = service(Arc::new(FixedLabels::new(&["pothole"])));
        let empty = StaticCapture(CapturedImage::new(Vec::new(), "image/jpeg"));

        let err = svc
            .submit(&draft(IssueType::Pothole, ""), &empty, &here())
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Please capture an image before submitting.");
    }

    #[tokio::test]
    async fn camera_failure_is_a_device_error() {
        let svc = service(Arc::new(FixedLabels::new(&["pothole"])));

        let err = svc
            .submit(&draft(IssueType::Pothole, ""), &FailingCapture, &here())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::Device { .. }));
    }

    #[tokio::test]
    async fn missing_location_degrades_to_placeholder() {
        let svc = service(Arc::new(FixedLabels::new(&["pothole"])));

        let outcome = svc
            .submit(&draft(IssueType::Pothole, ""), &photo(), &NoLocation)
            .await
            .unwrap();

        let SubmissionOutcome::Accepted { submission, .. } = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(submission.location, LOCATION_PLACEHOLDER);
    }

    #[tokio::test]
    async fn recognition_failure_persists_nothing() {
        let svc = service(Arc::new(FailingDetector));

        let err = svc
            .submit(&draft(IssueType::Pothole, ""), &photo(), &here())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::Recognition(_)));
        assert_eq!(err.user_message(), "Failed to submit report. Please try again.");
        assert!(svc.log().all().unwrap().is_empty());
    }
}
