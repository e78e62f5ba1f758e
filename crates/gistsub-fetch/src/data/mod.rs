//! Immutable data types for fetching: client options, responses and the
//! gist metadata schema.

pub mod gist;
pub mod options;
pub mod response;

pub use gist::{GistFile, GistMetadata};
pub use options::FetchOptions;
pub use response::{Headers, HttpResponse};
