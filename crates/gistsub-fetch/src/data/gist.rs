use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ResolveError;

/// The subset of `GET /gists/{id}` this crate relies on.
///
/// `files` keeps the order the service returned it in; choosing "the first
/// file" depends on it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GistMetadata {
    #[serde(default)]
    pub files: Option<IndexMap<String, Option<GistFile>>>,
}

/// One entry of `files`. Only `raw_url` is read; the rest is kept so an
/// entry with fields can be told apart from `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GistFile {
    #[serde(default)]
    pub raw_url: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl GistMetadata {
    pub fn from_slice(body: &[u8]) -> Result<Self, ResolveError> {
        serde_json::from_slice(body).map_err(|e| ResolveError::InvalidMetadata(e.to_string()))
    }

    pub fn file_count(&self) -> usize { self.files.as_ref().map_or(0, IndexMap::len) }
}

impl GistFile {
    /// `raw_url`, treating an empty string as absent.
    pub fn raw_url(&self) -> Option<&str> { self.raw_url.as_deref().filter(|u| !u.is_empty()) }

    /// `true` for an entry with no fields at all.
    pub fn is_empty(&self) -> bool { self.raw_url.is_none() && self.other.is_empty() }
}
