//! One fetch-validate-publish run as an explicit state machine.
//!
//! Every step returns the next [`State`]; the first terminal state ends the
//! loop and is applied exactly once by [`Pipeline::finish`], which records the
//! status document and emits the single terminal event.

mod outcome;

pub use outcome::{Outcome, OutcomeKind};

use std::time::Instant;

use bytes::Bytes;
use gistsub_fetch::core::{metadata_headers, metadata_url, raw_headers, resolve_file};
use gistsub_fetch::{GistMetadata, HttpClient, ResolveError};
use gistsub_fs::{AtomicWriteOptions, atomic_write};
use gistsub_state::{
    CacheTokenStore, Event, EventSink, RunStatus, StatusFields, StatusRecorder, unix_now,
};
use gistsub_verify::sha256_hex;
use thiserror::Error;

use crate::config::Config;

/// A local write failed. Ends the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Publish(#[from] gistsub_fs::Error),

    #[error(transparent)]
    State(#[from] gistsub_state::Error),
}

impl PipelineError {
    pub fn reason(&self) -> String { format!("io_error:{self}") }
}

impl From<PipelineError> for Outcome {
    fn from(e: PipelineError) -> Self { Outcome::failure(OutcomeKind::IoError, e.reason()) }
}

enum State {
    Start,
    MetadataOk {
        body: Bytes,
        etag: Option<String>,
    },
    FileOk {
        file:    String,
        raw_url: String,
        etag:    Option<String>,
    },
    RawOk {
        file: String,
        body: Bytes,
        etag: Option<String>,
    },
    Valid {
        file: String,
        body: Bytes,
        etag: Option<String>,
    },
    Done(Outcome),
}

pub struct Pipeline<C, S> {
    config: Config,
    client: C,
    sink:   S,
    tokens: CacheTokenStore,
    status: StatusRecorder,
}

impl<C: HttpClient, S: EventSink> Pipeline<C, S> {
    pub fn new(config: Config, client: C, sink: S) -> Self {
        let tokens = CacheTokenStore::for_artifact(&config.layout.artifact);
        let status = StatusRecorder::new(&config.layout.status);
        Self {
            config,
            client,
            sink,
            tokens,
            status,
        }
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn tokens(&self) -> &CacheTokenStore { &self.tokens }

    pub fn status(&self) -> &StatusRecorder { &self.status }

    /// Runs once and returns how it ended. Never panics on remote or local
    /// failures; they all become an [`Outcome`].
    pub async fn run(&self) -> Outcome {
        let started = Instant::now();
        let attempt_ts = unix_now();

        if let Err(e) = self.status.record(
            StatusFields::new()
                .last_attempt_ts(attempt_ts)
                .status(RunStatus::Started),
        ) {
            tracing::warn!(error = %e, "failed to record run start");
        }
        self.sink.emit(&self.event("fetch_start").field("status", RunStatus::Started.as_str()));

        let mut state = State::Start;
        let outcome = loop {
            state = match state {
                State::Start => self.fetch_metadata().await,
                State::MetadataOk { body, etag } => self.resolve(&body, etag),
                State::FileOk {
                    file,
                    raw_url,
                    etag,
                } => self.fetch_raw(file, &raw_url, etag).await,
                State::RawOk { file, body, etag } => self.validate(file, body, etag),
                State::Valid { file, body, etag } => self.publish(file, &body, etag),
                State::Done(outcome) => break outcome,
            };
        };

        self.finish(outcome, attempt_ts, started)
    }

    async fn fetch_metadata(&self) -> State {
        let url = metadata_url(&self.config.api_base, &self.config.gist_id);
        let cache_token = self.tokens.read();
        let headers = metadata_headers(self.token(), cache_token.as_deref());

        tracing::debug!(%url, conditional = cache_token.is_some(), "fetching metadata");

        match self.client.get(&url, &headers).await {
            Ok(response) => {
                let etag = response.headers.etag().map(str::to_string);
                if let Some(etag) = &etag
                    && let Err(e) = self.tokens.write(etag)
                {
                    return State::Done(PipelineError::from(e).into());
                }
                State::MetadataOk {
                    body: response.body,
                    etag,
                }
            }
            Err(e) if e.is_not_modified() => {
                let etag = e.headers().and_then(|h| h.etag()).map(str::to_string);
                State::Done(Outcome::not_modified(etag))
            }
            Err(e) => State::Done(Outcome::failure(OutcomeKind::MetadataError, e.classify())),
        }
    }

    fn resolve(&self, body: &[u8], etag: Option<String>) -> State {
        let resolved = GistMetadata::from_slice(body).and_then(|meta| {
            resolve_file(&meta, self.config.gist_file.as_deref())
                .map(|f| (f.name.to_string(), f.raw_url.to_string()))
        });

        match resolved {
            Ok((file, raw_url)) => State::FileOk {
                file,
                raw_url,
                etag,
            },
            Err(e @ ResolveError::InvalidMetadata(_)) => {
                tracing::warn!(error = %e, "unparseable gist metadata");
                State::Done(Outcome::failure(OutcomeKind::MetadataError, e.reason()))
            }
            Err(e) => State::Done(Outcome::failure(OutcomeKind::FileMissing, e.reason())),
        }
    }

    async fn fetch_raw(&self, file: String, raw_url: &str, etag: Option<String>) -> State {
        match self.client.get(raw_url, &raw_headers(self.token())).await {
            Ok(response) => State::RawOk {
                file,
                body: response.body,
                etag,
            },
            Err(e) => State::Done(Outcome::failure(
                OutcomeKind::RawError,
                format!("raw_download_failed:{e}"),
            )),
        }
    }

    fn validate(&self, file: String, body: Bytes, etag: Option<String>) -> State {
        match self.config.policy.validate(&body) {
            Ok(()) => State::Valid { file, body, etag },
            Err(rejection) => {
                tracing::warn!(%file, reason = %rejection.reason(), "content rejected");
                State::Done(Outcome::failure(OutcomeKind::Invalid, rejection.reason()))
            }
        }
    }

    fn publish(&self, file: String, body: &[u8], etag: Option<String>) -> State {
        let artifact = &self.config.layout.artifact;
        if let Err(e) = atomic_write(artifact, body, AtomicWriteOptions::new()) {
            return State::Done(PipelineError::from(e).into());
        }

        let sha256 = sha256_hex(body);
        tracing::info!(path = %artifact.display(), bytes = body.len(), %sha256, "published");
        State::Done(Outcome::success(file, body.len() as u64, sha256, etag))
    }

    /// Records the outcome and emits its event. A failed status write turns
    /// any outcome into an I/O error.
    fn finish(&self, mut outcome: Outcome, attempt_ts: i64, started: Instant) -> Outcome {
        outcome.duration_ms = started.elapsed().as_millis() as u64;

        if let Err(e) = self.status.record(outcome.status_fields(attempt_ts)) {
            tracing::error!(error = %e, "failed to record status");
            let duration_ms = outcome.duration_ms;
            outcome = PipelineError::from(e).into();
            outcome.duration_ms = duration_ms;
            if let Err(e) = self.status.record(outcome.status_fields(attempt_ts)) {
                tracing::warn!(error = %e, "failed to record io error");
            }
        }

        self.sink.emit(&outcome.event(&self.config.gist_id, &self.config.path_token));
        outcome
    }

    fn event(&self, name: &str) -> Event {
        Event::new(name)
            .field("gist_id", self.config.gist_id.as_str())
            .field("user_token", self.config.path_token.as_str())
    }

    fn token(&self) -> Option<&str> { self.config.github_token.as_deref() }
}
