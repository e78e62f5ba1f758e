use crate::error::{Rejection, Result};
use crate::sniff::is_html;

/// 5 MiB. Subscription documents are a few kilobytes; anything near this is
/// not what we expect to publish.
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// What a fetched document must look like before it is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPolicy {
    max_bytes:     usize,
    required_keys: Vec<String>,
}

impl Default for ContentPolicy {
    fn default() -> Self { Self::new() }
}

impl ContentPolicy {
    pub fn new() -> Self {
        Self {
            max_bytes:     DEFAULT_MAX_BYTES,
            required_keys: Vec::new(),
        }
    }

    pub fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn require_key(mut self, key: impl Into<String>) -> Self {
        self.required_keys.push(key.into());
        self
    }

    pub fn require_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn get_max_bytes(&self) -> usize { self.max_bytes }

    pub fn get_required_keys(&self) -> &[String] { &self.required_keys }

    /// Checks `data` against this policy. Pure; never touches I/O.
    ///
    /// The HTML sniff runs first so an error page is always reported as
    /// `html_response`, whatever its size.
    pub fn validate(&self, data: &[u8]) -> Result<()> {
        if is_html(data) {
            return Err(Rejection::HtmlResponse);
        }

        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(Rejection::Empty);
        }

        if data.len() > self.max_bytes {
            return Err(Rejection::TooLarge {
                limit: self.max_bytes,
            });
        }

        let text = std::str::from_utf8(data).map_err(|_| Rejection::NotUtf8)?;

        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| Rejection::YamlParse(e.to_string()))?;

        let mapping = value.as_mapping().ok_or(Rejection::NotMapping)?;

        if let Some(missing) = self
            .required_keys
            .iter()
            .find(|key| !mapping.contains_key(key.as_str()))
        {
            return Err(Rejection::MissingKey(missing.clone()));
        }

        Ok(())
    }
}

/// Validates `data` with the default policy.
pub fn validate(data: &[u8]) -> Result<()> { ContentPolicy::default().validate(data) }
