#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Image label detection and the label-match gate for issue reports.
//!
//! A report photo is sent to an external label detector (Google Cloud
//! Vision by default) and the returned labels are compared against the
//! reporter's claimed issue with a plain lexical overlap score. The
//! provider's own per-label confidence is carried along but never used by
//! the gate; see [`score`].

pub mod cloud_vision;
pub mod score;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use score::{ACCEPT_THRESHOLD, LabelScore, confidence, is_accepted};

/// Errors that can occur while detecting labels.
#[derive(Debug, Error)]
pub enum VisionError {
    /// HTTP request to the detection service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with an error payload or an unexpected shape.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// A still image captured for a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Encoded image bytes (JPEG/PNG).
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub mime_type: String,
}

impl CapturedImage {
    /// Wraps raw image bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Decodes a standard base64 payload.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Provider`] if `payload` is not valid base64.
    pub fn from_base64(payload: &str, mime_type: impl Into<String>) -> Result<Self, VisionError> {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| VisionError::Provider {
                message: format!("invalid base64 image: {e}"),
            })?;
        Ok(Self::new(bytes, mime_type))
    }

    /// Whether the capture holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 encoding of the image bytes.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// A label returned by a detector, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLabel {
    /// Lowercase label text.
    pub description: String,
    /// Provider confidence in `[0, 1]`. Not used for gating.
    pub score: f64,
}

impl DetectedLabel {
    /// Creates a label, lowercasing the description.
    #[must_use]
    pub fn new(description: &str, score: f64) -> Self {
        Self {
            description: description.to_lowercase(),
            score,
        }
    }
}

/// Trait for image label detection services.
#[async_trait::async_trait]
pub trait LabelDetector: Send + Sync {
    /// Detects labels in `image`. One outbound call per invocation, no
    /// retries.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError`] if the request fails or the response cannot
    /// be parsed.
    async fn detect(&self, image: &CapturedImage) -> Result<Vec<DetectedLabel>, VisionError>;
}

/// A detector that always returns the same labels.
///
/// Used for offline runs and tests where no detection service is reachable.
pub struct FixedLabels {
    labels: Vec<DetectedLabel>,
}

impl FixedLabels {
    /// Creates a detector returning `labels` with a provider score of 1.0.
    #[must_use]
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        Self {
            labels: labels
                .iter()
                .map(|l| DetectedLabel::new(l.as_ref(), 1.0))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl LabelDetector for FixedLabels {
    async fn detect(&self, _image: &CapturedImage) -> Result<Vec<DetectedLabel>, VisionError> {
        Ok(self.labels.clone())
    }
}

/// Creates the label detector from environment variables.
///
/// - `VISION_API_KEY` (required): Cloud Vision API key.
/// - `VISION_BASE_URL` (optional): overrides the annotate endpoint, e.g. for
///   a proxy.
/// - `VISION_MAX_RESULTS` (optional): labels requested per image.
///
/// # Errors
///
/// Returns [`VisionError::Config`] if `VISION_API_KEY` is unset or
/// `VISION_MAX_RESULTS` is not a positive integer.
pub fn create_detector_from_env() -> Result<Box<dyn LabelDetector>, VisionError> {
    let api_key = std::env::var("VISION_API_KEY").map_err(|_| VisionError::Config {
        message: "VISION_API_KEY environment variable not set".to_string(),
    })?;

    let mut detector = cloud_vision::CloudVisionDetector::new(api_key);

    if let Ok(base_url) = std::env::var("VISION_BASE_URL") {
        detector = detector.with_base_url(base_url);
    }

    if let Ok(raw) = std::env::var("VISION_MAX_RESULTS") {
        let max_results = raw
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| VisionError::Config {
                message: format!("VISION_MAX_RESULTS must be a positive integer, got {raw:?}"),
            })?;
        detector = detector.with_max_results(max_results);
    }

    log::info!("Using Cloud Vision label detector");
    Ok(Box::new(detector))
}
