use gistsub_state::{CacheTokenStore, RunStatus, StatusFields, StatusRecorder};
use serde_json::{Value, json};
use tempfile::tempdir;

#[test]
fn test_status_merge_preserves_unset_keys() {
    let dir = tempdir().unwrap();
    let recorder = StatusRecorder::new(dir.path().join("status.json"));

    recorder
        .record(StatusFields::new().last_error(Some("x")))
        .unwrap();
    recorder
        .record(StatusFields::new().status(RunStatus::Success))
        .unwrap();

    let doc = recorder.load();
    assert_eq!(doc["last_error"], json!("x"));
    assert_eq!(doc["status"], json!("success"));
}

#[test]
fn test_explicit_null_overwrites() {
    let dir = tempdir().unwrap();
    let recorder = StatusRecorder::new(dir.path().join("status.json"));

    recorder
        .record(StatusFields::new().last_error(Some("http_error:500:Internal Server Error")))
        .unwrap();
    recorder
        .record(StatusFields::new().last_error(None).status(RunStatus::NotModified))
        .unwrap();

    assert_eq!(recorder.load()["last_error"], Value::Null);
}

#[test]
fn test_full_success_record_shape() {
    let dir = tempdir().unwrap();
    let recorder = StatusRecorder::new(dir.path().join("tok").join("status.json"));

    recorder
        .record(
            StatusFields::new()
                .last_attempt_ts(100)
                .last_success_ts(100)
                .status(RunStatus::Success)
                .sha256("ab")
                .bytes(2)
                .duration_ms(7)
                .last_error(None)
                .etag("\"e\""),
        )
        .unwrap();

    let raw = std::fs::read_to_string(recorder.path()).unwrap();
    assert!(raw.ends_with('\n'));
    assert_eq!(raw.matches('\n').count(), 1);

    let keys = [
        "bytes",
        "duration_ms",
        "etag",
        "last_attempt_ts",
        "last_error",
        "last_success_ts",
        "sha256",
        "status",
    ];
    let positions: Vec<usize> = keys
        .iter()
        .map(|key| raw.find(&format!("\"{key}\":")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{raw}");
    assert!(raw.starts_with("{\"bytes\":2,"), "{raw}");

    let parsed: serde_json::Map<String, Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), keys.len());
}

#[test]
fn test_token_survives_status_rewrites() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("tok").join("proxies.yaml");
    let tokens = CacheTokenStore::for_artifact(&artifact);
    let recorder = StatusRecorder::new(dir.path().join("tok").join("status.json"));

    tokens.write("\"abc\"").unwrap();
    recorder
        .record(StatusFields::new().status(RunStatus::Error))
        .unwrap();

    assert_eq!(tokens.read().as_deref(), Some("\"abc\""));
}
