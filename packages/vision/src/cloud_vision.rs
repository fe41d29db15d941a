//! Google Cloud Vision label detection.
//!
//! One `images:annotate` POST per image with a single `LABEL_DETECTION`
//! feature. See <https://cloud.google.com/vision/docs/labels>.

use serde::{Deserialize, Serialize};

use crate::{CapturedImage, DetectedLabel, LabelDetector, VisionError};

/// Default annotate endpoint.
pub const DEFAULT_BASE_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Labels requested per image unless overridden.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Cloud Vision API client.
pub struct CloudVisionDetector {
    api_key: String,
    base_url: String,
    max_results: u32,
    client: reqwest::Client,
}

impl CloudVisionDetector {
    /// Creates a detector for the public endpoint.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the annotate endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Overrides the number of labels requested.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
    max_results: u32,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    error: Option<StatusDetail>,
}

#[derive(Deserialize)]
struct LabelAnnotation {
    description: String,
    #[serde(default)]
    score: f64,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: StatusDetail,
}

#[derive(Deserialize)]
struct StatusDetail {
    message: String,
}

#[async_trait::async_trait]
impl LabelDetector for CloudVisionDetector {
    async fn detect(&self, image: &CapturedImage) -> Result<Vec<DetectedLabel>, VisionError> {
        let request = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: image.to_base64(),
                },
                features: vec![Feature {
                    feature_type: "LABEL_DETECTION",
                    max_results: self.max_results,
                }],
            }],
        };

        log::debug!(
            "Requesting labels for {} byte {} image",
            image.bytes.len(),
            image.mime_type
        );

        let resp = self
            .client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map_or_else(|_| format!("HTTP {status}: {body}"), |e| e.error.message);
            log::warn!("Cloud Vision request failed: {message}");
            return Err(VisionError::Provider { message });
        }

        let labels = parse_response(&body)?;
        log::debug!("Cloud Vision returned {} labels", labels.len());
        Ok(labels)
    }
}

/// Parses an `images:annotate` response body into lowercase labels.
fn parse_response(body: &str) -> Result<Vec<DetectedLabel>, VisionError> {
    let parsed: AnnotateResponse = serde_json::from_str(body)?;

    let first = parsed
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| VisionError::Provider {
            message: "Cloud Vision response contained no results".to_string(),
        })?;

    if let Some(error) = first.error {
        return Err(VisionError::Provider {
            message: error.message,
        });
    }

    Ok(first
        .label_annotations
        .iter()
        .map(|a| DetectedLabel::new(&a.description, a.score))
        .collect())
}
