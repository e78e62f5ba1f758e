//! Pure functions: URL and header construction, file resolution.

mod request;
mod resolve;

pub use request::{GITHUB_ACCEPT, USER_AGENT, metadata_headers, metadata_url, raw_headers};
pub use resolve::{ResolvedFile, resolve_file};
