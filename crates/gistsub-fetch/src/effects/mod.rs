//! I/O: the HTTP client seam and its production implementation.

mod http;

pub use http::HttpClient;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
