//! Crash-safe file publication.
//!
//! Every write goes to a temporary sibling of the destination, is flushed to
//! durable storage and is then renamed over the destination. A concurrent
//! reader of the destination sees either the complete old content or the
//! complete new content, never a truncated file.

mod error;

pub use error::{Error, Result};

use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[cfg(unix)]
const DEFAULT_PERMISSIONS: u32 = 0o644;

#[cfg(not(unix))]
const DEFAULT_PERMISSIONS: u32 = 0;

#[derive(Clone, Copy, Debug)]
pub struct AtomicWriteOptions {
    permissions: u32,
    prefix:      &'static str,
    suffix:      &'static str,
    sync:        bool,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self { Self::new() }
}

impl AtomicWriteOptions {
    pub fn new() -> Self {
        Self {
            permissions: DEFAULT_PERMISSIONS,
            prefix:      ".",
            suffix:      ".tmp",
            sync:        true,
        }
    }

    #[cfg(unix)]
    pub fn permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    #[cfg(not(unix))]
    pub fn permissions(self, _permissions: u32) -> Self { self }

    pub fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }

    /// Skip `fsync` before the rename. Only useful for scratch data in tests.
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    #[cfg(unix)]
    pub fn into_permissions(self) -> Option<fs::Permissions> {
        Some(fs::Permissions::from_mode(self.permissions))
    }

    #[cfg(not(unix))]
    pub fn into_permissions(self) -> Option<fs::Permissions> { None }

    pub fn prefix_str(&self) -> &'static str { self.prefix }

    pub fn suffix_str(&self) -> &'static str { self.suffix }

    pub fn is_sync(&self) -> bool { self.sync }
}

/// Atomically replaces `path` with `content`.
///
/// The parent directory is created when missing. The temporary file lives in
/// the same directory so the final rename never crosses a filesystem. On any
/// error the temporary file is removed and `path` is left untouched.
pub fn atomic_write(
    path: impl AsRef<Path>,
    content: &[u8],
    options: AtomicWriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => return Err(Error::NoParent(path.to_path_buf())),
    };

    fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
        path: parent.to_path_buf(),
        source,
    })?;

    let mut tmp = tempfile::Builder::new()
        .prefix(options.prefix_str())
        .suffix(options.suffix_str())
        .tempfile_in(parent)
        .map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;

    let tmp_path = tmp.path().to_path_buf();
    let tmp_err = |source: std::io::Error| Error::Write {
        path: tmp_path.clone(),
        source,
    };

    tmp.write_all(content).map_err(tmp_err)?;
    tmp.flush().map_err(tmp_err)?;

    if let Some(perms) = options.into_permissions() {
        tmp.as_file().set_permissions(perms).map_err(tmp_err)?;
    }

    if options.is_sync() {
        tmp.as_file().sync_all().map_err(tmp_err)?;
    }

    // A failed persist hands the temp file back; dropping it unlinks it.
    tmp.persist(path).map_err(|e| Error::Write {
        path:   path.to_path_buf(),
        source: e.error,
    })?;

    if options.is_sync() {
        sync_dir(parent);
    }

    Ok(())
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Persists the rename itself. Best effort: not every platform or filesystem
/// allows opening a directory for sync.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(handle) = fs::File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.txt");
        atomic_write(&path, b"data", AtomicWriteOptions::new())?;
        assert_eq!(atomic_read(&path)?, b"data");
        Ok(())
    }

    #[test]
    fn test_atomic_write_creates_parent() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.yaml");
        atomic_write(&path, b"k: v\n", AtomicWriteOptions::new())?;
        assert_eq!(atomic_read(&path)?, b"k: v\n");
        Ok(())
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.yaml");
        atomic_write(&path, b"one", AtomicWriteOptions::new())?;
        atomic_write(&path, b"two", AtomicWriteOptions::new())?;

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.yaml".to_string()]);
        Ok(())
    }

    #[test]
    fn test_atomic_write_into_directory_fails_and_cleans_up() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        let result = atomic_write(&target, b"data", AtomicWriteOptions::new());
        assert!(matches!(result, Err(Error::Write { .. })));

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_atomic_read_missing() {
        let dir = tempdir().unwrap();
        let err = atomic_read(dir.path().join("nope")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[cfg(unix)]
    #[test]
    fn test_default_permissions_are_world_readable() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("published.yaml");
        atomic_write(&path, b"a: 1\n", AtomicWriteOptions::new())?;
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        Ok(())
    }
}
