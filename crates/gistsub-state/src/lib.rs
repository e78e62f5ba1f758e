//! Everything a run leaves behind besides the artifact itself.
//!
//! - [`CacheTokenStore`]: the ETag sidecar used for conditional requests
//! - [`StatusRecorder`]: the merge-updated `status.json`
//! - [`EventSink`]: one JSON line per significant transition
//!
//! All files are written through [`gistsub_fs::atomic_write`], so readers
//! never see them half-written. Each value owns its path; there is no
//! process-wide state.

mod error;
mod event;
mod status;
mod token;

pub use error::{Error, Result};
pub use event::{Event, EventSink, MemorySink, StdoutSink, unix_now};
pub use status::{RunStatus, StatusDocument, StatusFields, StatusRecorder};
pub use token::CacheTokenStore;
