//! Append-only list of accepted submissions.
//!
//! All submissions live under a single key, [`SUBMISSIONS_KEY`], as one
//! JSON array. Entries are never mutated or removed.

use std::sync::{Arc, Mutex};

use clearpath_reports_models::Submission;

use crate::store::{KeyValueStore, StoreError, json_kind};

/// Key holding the submission list.
pub const SUBMISSIONS_KEY: &str = "submissions";

/// Number of submissions shown on the profile page.
pub const DEFAULT_RECENT_LIMIT: usize = 3;

/// Append-only submission list on top of a [`KeyValueStore`].
pub struct SubmissionLog {
    store: Box<dyn KeyValueStore>,
    append_lock: Mutex<()>,
}

impl SubmissionLog {
    /// Wraps `store`.
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            append_lock: Mutex::new(()),
        }
    }

    /// Appends `submission` after all existing entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the list cannot be read or written.
    pub fn append(&self, submission: &Submission) -> Result<usize, StoreError> {
        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut entries = self.raw_entries()?;
        entries.push(serde_json::to_value(submission)?);
        let count = entries.len();
        self.store
            .put(SUBMISSIONS_KEY, serde_json::Value::Array(entries))?;

        log::debug!("Appended submission #{count} ({})", submission.issue_type);
        Ok(count)
    }

    /// All submissions in append order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the list cannot be read or an entry does
    /// not deserialize.
    pub fn all(&self) -> Result<Vec<Submission>, StoreError> {
        self.raw_entries()?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(StoreError::from))
            .collect()
    }

    /// The `limit` newest submissions by capture time, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the list cannot be read.
    pub fn recent(&self, limit: usize) -> Result<Vec<Submission>, StoreError> {
        let mut submissions = self.all()?;
        // Stable sort keeps later appends ahead on equal timestamps once reversed.
        submissions.sort_by_key(|s| s.captured_at);
        submissions.reverse();
        submissions.truncate(limit);
        Ok(submissions)
    }

    /// [`Self::append`] on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the list cannot be read or written.
    pub async fn record(self: Arc<Self>, submission: Submission) -> Result<usize, StoreError> {
        tokio::task::spawn_blocking(move || self.append(&submission))
            .await
            .map_err(join_error)?
    }

    /// [`Self::all`] on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the list cannot be read.
    pub async fn load_all(self: Arc<Self>) -> Result<Vec<Submission>, StoreError> {
        tokio::task::spawn_blocking(move || self.all())
            .await
            .map_err(join_error)?
    }

    /// [`Self::recent`] on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the list cannot be read.
    pub async fn load_recent(self: Arc<Self>, limit: usize) -> Result<Vec<Submission>, StoreError> {
        tokio::task::spawn_blocking(move || self.recent(limit))
            .await
            .map_err(join_error)?
    }

    fn raw_entries(&self) -> Result<Vec<serde_json::Value>, StoreError> {
        match self.store.get(SUBMISSIONS_KEY)? {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(serde_json::Value::Array(entries)) => Ok(entries),
            Some(other) => Err(StoreError::Corrupt {
                message: format!(
                    "{SUBMISSIONS_KEY:?} holds a JSON {} instead of an array",
                    json_kind(&other)
                ),
            }),
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> StoreError {
    StoreError::Io(std::io::Error::other(e))
}
