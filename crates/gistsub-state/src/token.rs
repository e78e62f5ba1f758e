use std::path::{Path, PathBuf};

use gistsub_fs::{AtomicWriteOptions, atomic_read, atomic_write};

use crate::Result;

/// The last ETag seen for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTokenStore {
    path: PathBuf,
}

impl CacheTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// The sidecar next to `artifact`: `<artifact>.etag`.
    pub fn for_artifact(artifact: &Path) -> Self {
        let mut path = artifact.as_os_str().to_owned();
        path.push(".etag");
        Self::new(path)
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Reads the stored token.
    ///
    /// Never fails: a missing, unreadable, non-UTF-8 or blank file reads as
    /// no token, which only costs one unconditional request.
    pub fn read(&self) -> Option<String> {
        let bytes = match atomic_read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable cache token");
                return None;
            }
        };

        let token = String::from_utf8(bytes).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    pub fn write(&self, token: &str) -> Result<()> {
        atomic_write(&self.path, token.as_bytes(), AtomicWriteOptions::new())?;
        Ok(())
    }
}
