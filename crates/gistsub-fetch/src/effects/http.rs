use std::future::Future;

use crate::data::HttpResponse;
use crate::error::Result;

/// Asynchronous HTTP client abstraction.
///
/// One call is one GET: no retries, no caching. Implementations follow
/// redirects per their own policy, enforce a finite timeout, and report any
/// non-2xx answer as [`TransportError::Status`](crate::TransportError::Status)
/// so callers can branch on 304.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Perform a GET with the given request headers.
    ///
    /// Returns the status, lower-cased headers and the full body of a 2xx
    /// response.
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<HttpResponse>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use crate::data::{FetchOptions, Headers};
    use crate::error::TransportError;
    use futures_util::StreamExt;

    /// Production HTTP client implementation using reqwest.
    #[derive(Clone, Debug)]
    pub struct ReqwestClient {
        client:         reqwest::Client,
        max_body_bytes: usize,
    }

    impl ReqwestClient {
        pub fn new(options: &FetchOptions) -> std::result::Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder()
                .timeout(options.timeout)
                .build()?;
            Ok(Self {
                client,
                max_body_bytes: options.max_body_bytes,
            })
        }

        fn network(e: reqwest::Error) -> TransportError {
            if e.is_timeout() {
                TransportError::network(format!("timed out: {e}"))
            } else {
                TransportError::network(e.to_string())
            }
        }
    }

    impl HttpClient for ReqwestClient {
        async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse> {
            let mut request = self.client.get(url);

            for (key, value) in headers {
                request = request.header(key.as_str(), value.as_str());
            }

            tracing::debug!(%url, "GET");

            let response = request.send().await.map_err(Self::network)?;
            let status = response.status();
            let response_headers: Headers = response
                .headers()
                .iter()
                .map(|(k, v)| (k.as_str(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
                .collect();

            if !status.is_success() {
                return Err(TransportError::status(
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown"),
                    response_headers,
                ));
            }

            if let Some(len) = response.content_length()
                && len > self.max_body_bytes as u64
            {
                return Err(TransportError::BodyTooLarge {
                    limit: self.max_body_bytes,
                });
            }

            let mut body = Vec::new();
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(Self::network)?;
                if body.len() + chunk.len() > self.max_body_bytes {
                    return Err(TransportError::BodyTooLarge {
                        limit: self.max_body_bytes,
                    });
                }
                body.extend_from_slice(&chunk);
            }

            tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "response");

            Ok(HttpResponse::new(status.as_u16(), response_headers, body))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
