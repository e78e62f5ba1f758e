use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use gistsub::{Cli, Config, Pipeline, Registry};
use gistsub_fetch::ReqwestClient;
use gistsub_state::{EventSink, StdoutSink};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GISTSUB_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            StdoutSink.emit(&e.event());
            return ExitCode::from(2);
        }
    };

    match run(config) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %format_args!("{e:#}"), "run aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> anyhow::Result<u8> {
    let registry = Registry::load(&config.registry_path);
    match registry.get(&config.path_token) {
        Some(entry) => tracing::info!(
            user = entry.name.as_deref().unwrap_or("-"),
            enabled = entry.enabled,
            "registered path token"
        ),
        None => tracing::info!(known = registry.len(), "path token not in registry"),
    }

    let client = ReqwestClient::new(&config.fetch).context("failed to build HTTP client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let pipeline = Pipeline::new(config, client, StdoutSink);
    let outcome = runtime.block_on(pipeline.run());

    tracing::info!(
        status = %outcome.status(),
        reason = outcome.reason.as_deref().unwrap_or("-"),
        duration_ms = outcome.duration_ms,
        "run finished"
    );
    Ok(outcome.exit_code())
}
