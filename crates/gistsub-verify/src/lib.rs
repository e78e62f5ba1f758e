//! Content checks for fetched documents.
//!
//! Two layers run in order: an HTML sniff that catches error pages served as
//! `200 OK`, then a [`ContentPolicy`] describing the expected YAML document.
//! Rejections carry a stable reason string via [`Rejection::reason`].
//!
//! # Example
//!
//! ```
//! use gistsub_verify::{ContentPolicy, sha256_hex};
//!
//! let body = b"proxies: []\n";
//! ContentPolicy::new().require_key("proxies").validate(body).unwrap();
//! assert_eq!(sha256_hex(body).len(), 64);
//! ```

pub use self::error::{Rejection, Result};
pub use self::hasher::sha256_hex;
pub use self::sniff::is_html;
pub use self::validate::{ContentPolicy, DEFAULT_MAX_BYTES, validate};

mod error;
mod hasher;
mod sniff;
mod validate;
