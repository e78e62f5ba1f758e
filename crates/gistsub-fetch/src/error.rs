//! Error types for gistsub-fetch.

use thiserror::Error;

use crate::data::Headers;

/// A failed GET.
///
/// `Status` means the server answered with a non-2xx code (304 included);
/// everything else means there was no usable response at all.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("HTTP {status}: {reason}")]
    Status {
        status:  u16,
        reason:  String,
        headers: Headers,
    },

    #[error("{0}")]
    Network(String),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
}

impl TransportError {
    pub fn status(status: u16, reason: impl Into<String>, headers: Headers) -> Self {
        Self::Status {
            status,
            reason: reason.into(),
            headers,
        }
    }

    pub fn network<S: Into<String>>(msg: S) -> Self { Self::Network(msg.into()) }

    /// Gets the HTTP status code if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_modified(&self) -> bool { self.status_code() == Some(304) }

    /// Response headers, present only when the server answered.
    pub fn headers(&self) -> Option<&Headers> {
        match self {
            TransportError::Status { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// `http_error:<code>:<reason>` or `network_error:<detail>`.
    pub fn classify(&self) -> String {
        match self {
            TransportError::Status { status, reason, .. } => {
                format!("http_error:{status}:{reason}")
            }
            other => format!("network_error:{other}"),
        }
    }
}

/// The metadata document does not lead to a downloadable file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("gist metadata is not valid JSON: {0}")]
    InvalidMetadata(String),

    #[error("gist has no files")]
    NoFiles,

    #[error("file '{0}' not found in gist")]
    FileNotFound(String),

    #[error("gist file has no raw_url")]
    MissingRawUrl,
}

impl ResolveError {
    /// Stable reason recorded as `last_error`.
    pub fn reason(&self) -> String {
        match self {
            ResolveError::InvalidMetadata(_) => "invalid_metadata".to_string(),
            ResolveError::NoFiles => "no_files_in_gist".to_string(),
            ResolveError::FileNotFound(name) => format!("gist_file_not_found:{name}"),
            ResolveError::MissingRawUrl => "missing_raw_url".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
