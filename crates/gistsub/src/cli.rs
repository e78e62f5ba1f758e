use std::path::PathBuf;

use clap::Parser;

/// Every flag can also come from the environment, which is how cron and
/// systemd units usually configure a run.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "gistsub", version, about = "Fetch one gist file and publish it atomically")]
pub struct Cli {
    /// Gist to fetch.
    #[arg(long, env = "GIST_ID")]
    pub gist_id: Option<String>,

    /// File inside the gist. Defaults to the first file the API lists.
    #[arg(long, env = "GIST_FILE")]
    pub gist_file: Option<String>,

    /// Sent as a bearer token on both requests.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Root of all published outputs [default: data/sub]
    #[arg(long, env = "OUTPUT_BASE")]
    pub output_base: Option<PathBuf>,

    /// Per-subscriber directory under the output base.
    #[arg(long, env = "PATH_TOKEN", hide_env_values = true)]
    pub path_token: Option<String>,

    /// Artifact file name [default: proxies.yaml]
    #[arg(long, env = "OUTPUT_NAME")]
    pub output_name: Option<String>,

    /// User registry table [default: /etc/gist-sub.users.json]
    #[arg(long, env = "REGISTRY_PATH")]
    pub registry_path: Option<PathBuf>,

    /// API root, for GitHub Enterprise hosts [default: https://api.github.com]
    #[arg(long, env = "GIST_API_BASE")]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds [default: 20]
    #[arg(long, env = "FETCH_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Largest artifact accepted, in bytes [default: 5242880]
    #[arg(long, env = "MAX_BYTES")]
    pub max_bytes: Option<usize>,

    /// Top-level key the document must contain. Repeatable.
    #[arg(long = "require-key", env = "REQUIRE_KEYS", value_delimiter = ',')]
    pub require_keys: Vec<String>,
}
