//! Injected device access: photo capture and location fixes.

use std::path::PathBuf;

use clearpath_environment_models::GeoPoint;
use clearpath_vision::CapturedImage;

use crate::ReportError;

/// Shown in place of a location when no fix is available.
pub const LOCATION_PLACEHOLDER: &str = "Location unavailable";

/// Where a report was made.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLocation {
    /// A device fix.
    Coordinates(GeoPoint),
    /// A typed address or landmark.
    Address(String),
}

impl std::fmt::Display for ReportLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coordinates(point) => write!(f, "{point}"),
            Self::Address(address) => f.write_str(address),
        }
    }
}

/// Single-shot location lookup.
#[async_trait::async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns the current location.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Device`] if no fix can be obtained.
    async fn locate(&self) -> Result<ReportLocation, ReportError>;
}

/// Single-shot still image capture.
#[async_trait::async_trait]
pub trait CaptureProvider: Send + Sync {
    /// Captures one image.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Device`] if the camera or source is unavailable.
    async fn capture(&self) -> Result<CapturedImage, ReportError>;
}

/// A location known up front, e.g. sent along with an API request.
pub struct FixedLocation(pub ReportLocation);

#[async_trait::async_trait]
impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Result<ReportLocation, ReportError> {
        Ok(self.0.clone())
    }
}

/// A location provider with no positioning hardware.
pub struct NoLocation;

#[async_trait::async_trait]
impl LocationProvider for NoLocation {
    async fn locate(&self) -> Result<ReportLocation, ReportError> {
        Err(ReportError::Device {
            message: "Geolocation is not available".to_string(),
        })
    }
}

/// An image that was already captured elsewhere.
pub struct StaticCapture(pub CapturedImage);

#[async_trait::async_trait]
impl CaptureProvider for StaticCapture {
    async fn capture(&self) -> Result<CapturedImage, ReportError> {
        Ok(self.0.clone())
    }
}

/// Reads the image from a file on disk.
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    /// Captures from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn mime_type(&self) -> &'static str {
        match self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        }
    }
}

#[async_trait::async_trait]
impl CaptureProvider for FileCapture {
    async fn capture(&self) -> Result<CapturedImage, ReportError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ReportError::Device {
                message: format!("Unable to read image {}: {e}", self.path.display()),
            })?;
        Ok(CapturedImage::new(bytes, self.mime_type()))
    }
}
