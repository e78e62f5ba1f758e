//! Fetch one file of a gist, check it and publish it to a stable path.
//!
//! A run is a single pass through [`Pipeline::run`]: conditional metadata
//! request, file resolution, raw download, validation and atomic publish.
//! The result is one [`Outcome`], one status document update and one terminal
//! event. Scheduling and retries belong to whatever invokes the binary.

pub mod cli;
pub mod config;
pub mod pipeline;
pub mod registry;

pub use cli::Cli;
pub use config::{Config, ConfigError, OutputLayout};
pub use pipeline::{Outcome, OutcomeKind, Pipeline, PipelineError};
pub use registry::{Registry, RegistryEntry};
