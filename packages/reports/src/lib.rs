#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Citizen issue reporting.
//!
//! [`service::ReportService`] runs one report through validation, photo
//! capture, location lookup, label detection and the label-match gate,
//! then appends accepted reports to the [`submission_log::SubmissionLog`].
//! Camera, geolocation and storage are injected through the traits in
//! [`providers`] and [`store`] so the flow runs the same in the server, the
//! CLI and tests. [`profile`] and [`rewards`] back the profile page.

pub mod leaderboard;
pub mod profile;
pub mod providers;
pub mod rewards;
pub mod service;
pub mod store;
pub mod submission_log;

use clearpath_vision::VisionError;
use thiserror::Error;

pub use leaderboard::leaderboard;
pub use profile::profile;
pub use rewards::rewards;
pub use service::{ACCEPTED_REPORT_POINTS, ReportService, SubmissionOutcome};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use submission_log::SubmissionLog;

/// Errors that can occur while submitting a report.
///
/// None of these are fatal: each maps to a message via
/// [`ReportError::user_message`] and the reporter can correct and retry.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The draft is incomplete. Nothing was captured or sent.
    #[error("Validation failed: {message}")]
    Validation {
        /// What is missing.
        message: String,
    },

    /// The camera or another device could not be used.
    #[error("Device unavailable: {message}")]
    Device {
        /// Description of the failure.
        message: String,
    },

    /// The label detection call failed.
    #[error("Recognition failed: {0}")]
    Recognition(#[from] VisionError),

    /// The submission log could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ReportError {
    /// The message shown to the reporter.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } | Self::Device { message } => message.clone(),
            Self::Recognition(_) => "Failed to submit report. Please try again.".to_string(),
            Self::Storage(_) => "Failed to save report. Please try again.".to_string(),
        }
    }
}
