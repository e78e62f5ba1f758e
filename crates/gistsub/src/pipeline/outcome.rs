use gistsub_state::{Event, RunStatus, StatusFields};
use serde_json::Value;

/// The terminal states of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// The server answered 304; nothing was downloaded.
    NotModified,
    /// The metadata request failed or returned an unusable document.
    MetadataError,
    /// The metadata does not lead to a downloadable file.
    FileMissing,
    /// The raw content request failed.
    RawError,
    /// The content was downloaded but rejected.
    Invalid,
    /// The artifact was published.
    Success,
    /// A local write failed.
    IoError,
}

impl OutcomeKind {
    pub fn status(&self) -> RunStatus {
        match self {
            OutcomeKind::NotModified => RunStatus::NotModified,
            OutcomeKind::Success => RunStatus::Success,
            OutcomeKind::Invalid => RunStatus::Invalid,
            OutcomeKind::MetadataError
            | OutcomeKind::FileMissing
            | OutcomeKind::RawError
            | OutcomeKind::IoError => RunStatus::Error,
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            OutcomeKind::NotModified => "fetch_not_modified",
            OutcomeKind::Success => "fetch_success",
            OutcomeKind::Invalid => "fetch_invalid",
            OutcomeKind::MetadataError
            | OutcomeKind::FileMissing
            | OutcomeKind::RawError
            | OutcomeKind::IoError => "fetch_error",
        }
    }
}

/// What a run ended with. Built by the state machine, applied once when the
/// run finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub kind:        OutcomeKind,
    pub reason:      Option<String>,
    pub file:        Option<String>,
    pub etag:        Option<String>,
    pub sha256:      Option<String>,
    pub bytes:       Option<u64>,
    pub duration_ms: u64,
}

impl Outcome {
    fn new(kind: OutcomeKind) -> Self {
        Self {
            kind,
            reason: None,
            file: None,
            etag: None,
            sha256: None,
            bytes: None,
            duration_ms: 0,
        }
    }

    pub fn not_modified(etag: Option<String>) -> Self {
        Self {
            etag,
            ..Self::new(OutcomeKind::NotModified)
        }
    }

    pub fn failure(kind: OutcomeKind, reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::new(kind)
        }
    }

    pub fn success(file: String, bytes: u64, sha256: String, etag: Option<String>) -> Self {
        Self {
            file: Some(file),
            etag,
            sha256: Some(sha256),
            bytes: Some(bytes),
            ..Self::new(OutcomeKind::Success)
        }
    }

    pub fn status(&self) -> RunStatus { self.kind.status() }

    /// 0 for success and not-modified, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.status().is_ok() { 0 } else { 1 }
    }

    /// The keys this outcome writes into the status document. A success is
    /// stamped with the attempt time, not the time it finished.
    pub fn status_fields(&self, attempt_ts: i64) -> StatusFields {
        let mut fields = StatusFields::new()
            .last_attempt_ts(attempt_ts)
            .status(self.status())
            .duration_ms(self.duration_ms);

        match self.kind {
            OutcomeKind::Success => {
                fields = fields.last_success_ts(attempt_ts).last_error(None);
                if let Some(sha256) = &self.sha256 {
                    fields = fields.sha256(sha256);
                }
                if let Some(bytes) = self.bytes {
                    fields = fields.bytes(bytes);
                }
            }
            OutcomeKind::NotModified => fields = fields.last_error(None),
            _ => fields = fields.last_error(self.reason.as_deref()),
        }

        if self.status().is_ok()
            && let Some(etag) = &self.etag
        {
            fields = fields.etag(etag);
        }
        fields
    }

    /// The terminal event for this outcome.
    pub fn event(&self, gist_id: &str, user_token: &str) -> Event {
        let mut event = Event::new(self.kind.event_name())
            .field("gist_id", gist_id)
            .field("user_token", user_token)
            .field("status", self.status().as_str());

        match self.kind {
            OutcomeKind::Success => {
                event = event
                    .field("file", self.file.clone().map_or(Value::Null, Value::from))
                    .field("etag", self.etag.clone().map_or(Value::Null, Value::from))
                    .field("sha256", self.sha256.clone().map_or(Value::Null, Value::from))
                    .field("bytes", self.bytes.unwrap_or_default());
            }
            OutcomeKind::NotModified => {
                event = event.field("etag", self.etag.clone().map_or(Value::Null, Value::from));
            }
            _ => {
                event = event.field("error", self.reason.clone().unwrap_or_default());
            }
        }

        event.field("duration_ms", self.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exit_codes() {
        assert_eq!(Outcome::not_modified(None).exit_code(), 0);
        assert_eq!(
            Outcome::success("a".into(), 1, "ff".into(), None).exit_code(),
            0
        );
        for kind in [
            OutcomeKind::MetadataError,
            OutcomeKind::FileMissing,
            OutcomeKind::RawError,
            OutcomeKind::Invalid,
            OutcomeKind::IoError,
        ] {
            assert_eq!(Outcome::failure(kind, "x").exit_code(), 1, "{kind:?}");
        }
    }

    #[test]
    fn failure_fields_and_event() {
        let mut outcome = Outcome::failure(OutcomeKind::FileMissing, "no_files_in_gist");
        outcome.duration_ms = 12;

        let fields = outcome.status_fields(100);
        assert_eq!(fields.get("status"), Some(&json!("error")));
        assert_eq!(fields.get("last_error"), Some(&json!("no_files_in_gist")));
        assert_eq!(fields.get("last_success_ts"), None);
        assert_eq!(fields.get("etag"), None);

        let event = outcome.event("g1", "u1");
        assert_eq!(event.name, "fetch_error");
        assert_eq!(event.get("error"), Some(&json!("no_files_in_gist")));
        assert_eq!(event.get("user_token"), Some(&json!("u1")));
        assert_eq!(event.get("duration_ms"), Some(&json!(12)));
    }

    #[test]
    fn invalid_is_its_own_status() {
        let outcome = Outcome::failure(OutcomeKind::Invalid, "html_response");
        assert_eq!(outcome.status(), RunStatus::Invalid);
        assert_eq!(outcome.event("g", "u").name, "fetch_invalid");
    }

    #[test]
    fn success_fields() {
        let outcome = Outcome::success("a.yaml".into(), 3, "abcd".into(), Some("\"v1\"".into()));
        let fields = outcome.status_fields(100);

        assert_eq!(fields.get("last_success_ts"), Some(&json!(100)));
        assert_eq!(fields.get("last_error"), Some(&Value::Null));
        assert_eq!(fields.get("sha256"), Some(&json!("abcd")));
        assert_eq!(fields.get("bytes"), Some(&json!(3)));
        assert_eq!(fields.get("etag"), Some(&json!("\"v1\"")));

        let event = outcome.event("g", "u");
        assert_eq!(event.get("file"), Some(&json!("a.yaml")));
        assert_eq!(event.get("bytes"), Some(&json!(3)));
    }

    #[test]
    fn not_modified_without_etag_leaves_etag_alone() {
        let fields = Outcome::not_modified(None).status_fields(1);
        assert_eq!(fields.get("etag"), None);
        assert_eq!(fields.get("last_error"), Some(&Value::Null));
        assert_eq!(fields.get("status"), Some(&json!("not_modified")));
    }
}
