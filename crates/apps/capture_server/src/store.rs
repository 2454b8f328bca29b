use std::path::{Path, PathBuf};

use formats::{SubmissionsError, encode_submissions, load_submissions_or_default};
use serde_json::Value;
use tokio::sync::Mutex;

/// Ordered submissions, mirrored to a JSON array file after every append.
///
/// The lock is held across the file write, so concurrent requests cannot
/// interleave and the file always matches the in-memory list.
#[derive(Debug)]
pub struct SubmissionStore {
    path: PathBuf,
    entries: Mutex<Vec<Value>>,
}

impl SubmissionStore {
    pub fn new(path: impl Into<PathBuf>, entries: Vec<Value>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(entries),
        }
    }

    /// Seeds the list from `path`; a missing file starts an empty list.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SubmissionsError> {
        let path = path.into();
        let entries = load_submissions_or_default(&path)?;
        Ok(Self::new(path, entries))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `entry` and rewrites the file; returns the new length.
    ///
    /// On a failed write the entry is dropped again.
    pub async fn append(&self, entry: Value) -> Result<usize, SubmissionsError> {
        let mut entries = self.entries.lock().await;
        entries.push(entry);

        let written = match encode_submissions(&entries) {
            Ok(payload) => tokio::fs::write(&self.path, payload)
                .await
                .map_err(|source| SubmissionsError::Io {
                    path: self.path.clone(),
                    source,
                }),
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            entries.pop();
            return Err(err);
        }
        Ok(entries.len())
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
