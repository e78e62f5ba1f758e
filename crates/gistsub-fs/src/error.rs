use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write '{path}': {source}")]
    Write {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read '{path}': {source}")]
    Read {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("path has no parent directory: '{0}'")]
    NoParent(PathBuf),
}

impl Error {
    /// Returns the underlying I/O error kind, if any.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::Write { source, .. }
            | Error::Read { source, .. }
            | Error::CreateDir { source, .. } => Some(source.kind()),
            Error::NoParent(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool { self.io_kind() == Some(io::ErrorKind::NotFound) }
}

pub type Result<T> = std::result::Result<T, Error>;
