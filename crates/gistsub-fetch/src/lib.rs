//! Conditional, single-shot retrieval of a gist and one of its files.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration, responses and the metadata schema
//! - [`core`] - Pure transformations (headers, URL building, file resolution)
//! - [`effects`] - I/O operations behind the [`HttpClient`] trait
//!
//! Mechanism only: no retries and no persistence. The caller owns the cache
//! token and decides what a 304 means.

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use data::{FetchOptions, GistFile, GistMetadata, Headers, HttpResponse};
pub use effects::HttpClient;

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{ResolveError, Result, TransportError};
