//! The capture file: a JSON array holding every submitted payload in order.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

#[derive(Debug)]
pub enum SubmissionsError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    NotAnArray,
}

impl fmt::Display for SubmissionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionsError::Io { path, source } => {
                write!(f, "submissions file {}: {source}", path.display())
            }
            SubmissionsError::Parse(err) => write!(f, "submissions parse error: {err}"),
            SubmissionsError::NotAnArray => write!(f, "submissions file must hold a JSON array"),
        }
    }
}

impl std::error::Error for SubmissionsError {}

/// Blank input decodes to an empty list.
pub fn decode_submissions(payload: &str) -> Result<Vec<Value>, SubmissionsError> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(payload).map_err(SubmissionsError::Parse)? {
        Value::Array(items) => Ok(items),
        _ => Err(SubmissionsError::NotAnArray),
    }
}

pub fn encode_submissions(entries: &[Value]) -> Result<String, SubmissionsError> {
    serde_json::to_string(entries).map_err(SubmissionsError::Parse)
}

pub fn load_submissions(path: impl AsRef<Path>) -> Result<Vec<Value>, SubmissionsError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|source| SubmissionsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_submissions(&payload)
}

/// Like [`load_submissions`], but a missing file yields an empty list.
pub fn load_submissions_or_default(
    path: impl AsRef<Path>,
) -> Result<Vec<Value>, SubmissionsError> {
    match load_submissions(path) {
        Err(SubmissionsError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            Ok(Vec::new())
        }
        other => other,
    }
}

pub fn write_submissions(
    path: impl AsRef<Path>,
    entries: &[Value],
) -> Result<(), SubmissionsError> {
    let path = path.as_ref();
    let payload = encode_submissions(entries)?;
    fs::write(path, payload).map_err(|source| SubmissionsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
