use std::path::{Path, PathBuf};
use std::time::Duration;

use gistsub_fetch::FetchOptions;
use gistsub_fetch::data::options::DEFAULT_MAX_BODY_BYTES;
use gistsub_state::{Event, RunStatus};
use gistsub_verify::{ContentPolicy, DEFAULT_MAX_BYTES};
use thiserror::Error;

use crate::cli::Cli;

pub const DEFAULT_OUTPUT_BASE: &str = "data/sub";
pub const DEFAULT_OUTPUT_NAME: &str = "proxies.yaml";
pub const DEFAULT_REGISTRY_PATH: &str = "/etc/gist-sub.users.json";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const STATUS_FILE_NAME: &str = "status.json";

/// Missing or unusable input. Detected before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("GIST_ID is required")]
    MissingGistId,

    #[error("PATH_TOKEN is required")]
    MissingPathToken,

    #[error("PATH_TOKEN must be a single path segment")]
    InvalidPathToken,

    #[error("OUTPUT_NAME must be a plain file name")]
    InvalidOutputName,
}

impl ConfigError {
    pub fn reason(&self) -> &'static str {
        match self {
            ConfigError::MissingGistId => "missing_gist_id",
            ConfigError::MissingPathToken => "missing_path_token",
            ConfigError::InvalidPathToken => "invalid_path_token",
            ConfigError::InvalidOutputName => "invalid_output_name",
        }
    }

    /// The `config_error` event reported before exiting.
    pub fn event(&self) -> Event {
        Event::new("config_error")
            .field("status", RunStatus::Error.as_str())
            .field("error", self.reason())
    }
}

/// Where one subscriber's files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub dir:      PathBuf,
    pub artifact: PathBuf,
    pub status:   PathBuf,
}

impl OutputLayout {
    pub fn new(base: &Path, path_token: &str, output_name: &str) -> Self {
        let dir = base.join(path_token);
        Self {
            artifact: dir.join(output_name),
            status: dir.join(STATUS_FILE_NAME),
            dir,
        }
    }
}

/// A validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub gist_id:       String,
    pub gist_file:     Option<String>,
    pub github_token:  Option<String>,
    pub path_token:    String,
    pub api_base:      String,
    pub registry_path: PathBuf,
    pub layout:        OutputLayout,
    pub fetch:         FetchOptions,
    pub policy:        ContentPolicy,
}

impl Config {
    /// Applies defaults and validates. Empty strings count as unset.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let gist_id = non_empty(cli.gist_id).ok_or(ConfigError::MissingGistId)?;
        let path_token = non_empty(cli.path_token).ok_or(ConfigError::MissingPathToken)?;
        if !is_plain_segment(&path_token) {
            return Err(ConfigError::InvalidPathToken);
        }

        let output_name =
            non_empty(cli.output_name).unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string());
        if !is_plain_segment(&output_name) {
            return Err(ConfigError::InvalidOutputName);
        }

        let output_base = cli
            .output_base
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_BASE));

        let registry_path = cli
            .registry_path
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY_PATH));

        let timeout = Duration::from_secs(cli.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let max_bytes = cli.max_bytes.unwrap_or(DEFAULT_MAX_BYTES);

        let require_keys = cli
            .require_keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Self {
            layout: OutputLayout::new(&output_base, &path_token, &output_name),
            gist_id,
            gist_file: non_empty(cli.gist_file),
            github_token: non_empty(cli.github_token),
            path_token,
            api_base: non_empty(cli.api_base).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            registry_path,
            fetch: FetchOptions::default()
                .timeout(timeout)
                .max_body_bytes(max_bytes.saturating_add(1).max(DEFAULT_MAX_BODY_BYTES)),
            policy: ContentPolicy::new()
                .max_bytes(max_bytes)
                .require_keys(require_keys),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> { value.filter(|v| !v.trim().is_empty()) }

fn is_plain_segment(segment: &str) -> bool {
    segment != "." && segment != ".." && !segment.contains(['/', '\\', '\0'])
}
