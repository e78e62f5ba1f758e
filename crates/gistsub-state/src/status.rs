use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use gistsub_fs::{AtomicWriteOptions, atomic_read, atomic_write};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// The persisted status document: a flat JSON object.
pub type StatusDocument = Map<String, Value>;

/// Outcome classification written to the `status` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Started,
    Success,
    NotModified,
    Invalid,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Started => "started",
            RunStatus::Success => "success",
            RunStatus::NotModified => "not_modified",
            RunStatus::Invalid => "invalid",
            RunStatus::Error => "error",
        }
    }

    /// `true` for outcomes that exit 0.
    pub fn is_ok(&self) -> bool { matches!(self, RunStatus::Success | RunStatus::NotModified) }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// The keys one run sets. Keys not set here are left alone by
/// [`StatusRecorder::record`].
///
/// # Examples
///
/// ```
/// use gistsub_state::{RunStatus, StatusFields};
///
/// let fields = StatusFields::new()
///     .status(RunStatus::Error)
///     .last_error(Some("no_files_in_gist"));
/// assert_eq!(fields.get("status").unwrap(), "error");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusFields(StatusDocument);

impl StatusFields {
    pub fn new() -> Self { Self::default() }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn last_attempt_ts(self, ts: i64) -> Self { self.set("last_attempt_ts", ts) }

    pub fn last_success_ts(self, ts: i64) -> Self { self.set("last_success_ts", ts) }

    pub fn status(self, status: RunStatus) -> Self { self.set("status", status.as_str()) }

    /// `None` writes an explicit `null`, clearing an earlier error.
    pub fn last_error(self, error: Option<&str>) -> Self {
        let value = error.map_or(Value::Null, Value::from);
        self.set("last_error", value)
    }

    pub fn bytes(self, bytes: u64) -> Self { self.set("bytes", bytes) }

    pub fn duration_ms(self, duration_ms: u64) -> Self { self.set("duration_ms", duration_ms) }

    pub fn sha256(self, digest: &str) -> Self { self.set("sha256", digest) }

    pub fn etag(self, etag: &str) -> Self { self.set("etag", etag) }

    pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }

    pub fn into_map(self) -> StatusDocument { self.0 }
}

/// Merge-updates the status document of one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecorder {
    path: PathBuf,
}

impl StatusRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    /// Loads the current document.
    ///
    /// Missing, unreadable, corrupt or non-object documents load as empty so
    /// that a damaged file is repaired by the next write instead of wedging
    /// every later run.
    pub fn load(&self) -> StatusDocument {
        let bytes = match atomic_read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return StatusDocument::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "status document unreadable, starting fresh");
                return StatusDocument::new();
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "status document is not an object, starting fresh");
                StatusDocument::new()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "status document corrupt, starting fresh");
                StatusDocument::new()
            }
        }
    }

    /// Merges `fields` into the stored document and rewrites it atomically.
    /// Returns the document as written.
    pub fn record(&self, fields: StatusFields) -> Result<StatusDocument> {
        let mut document = self.load();
        document.extend(fields.into_map());

        atomic_write(&self.path, &encode(&document)?, AtomicWriteOptions::new())?;
        Ok(document)
    }
}

/// Sorted keys, UTF-8, one trailing newline.
fn encode(document: &StatusDocument) -> Result<Vec<u8>> {
    let sorted: BTreeMap<&String, &Value> = document.iter().collect();
    let mut bytes = serde_json::to_vec(&sorted)?;
    bytes.push(b'\n');
    Ok(bytes)
}
