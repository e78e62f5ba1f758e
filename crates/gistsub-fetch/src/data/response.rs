use std::collections::HashMap;

use bytes::Bytes;

/// Response headers with lower-cased names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self { Self::default() }

    pub fn insert<K: AsRef<str>, V: Into<String>>(&mut self, key: K, value: V) {
        self.inner
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `etag` header, if present and non-blank.
    pub fn etag(&self) -> Option<&str> {
        self.get("etag").map(str::trim).filter(|v| !v.is_empty())
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// A successful (2xx) response, body fully read.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status:  u16,
    pub headers: Headers,
    pub body:    Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Headers, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Bytes>) -> Self { Self::new(200, Headers::new(), body) }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }
}
