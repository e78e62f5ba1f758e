use std::io::Write;
use std::sync::{Arc, Mutex};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Current wall-clock time in unix seconds.
pub fn unix_now() -> i64 { chrono::Utc::now().timestamp() }

/// One structured record on the event stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub ts:     i64,
    pub name:   String,
    pub fields: Vec<(String, Value)>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            ts:     unix_now(),
            name:   name.into(),
            fields: Vec::new(),
        }
    }

    pub fn at(mut self, ts: i64) -> Self {
        self.ts = ts;
        self
    }

    /// Adds or replaces a field. `ts` and `event` are reserved and ignored.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key == "ts" || key == "event" {
            return self;
        }
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Compact JSON without a trailing newline.
    pub fn to_json_line(&self) -> serde_json::Result<String> { serde_json::to_string(self) }
}

/// A flat object: `ts`, `event`, then fields in insertion order.
impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry("ts", &self.ts)?;
        map.serialize_entry("event", &self.name)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Where events go. Emitting is fire-and-forget and must never fail a run.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &Event) { (**self).emit(event) }
}

/// Writes one line per event to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn emit(&self, event: &Event) {
        let mut out = std::io::stdout().lock();
        let written = serde_json::to_writer(&mut out, event)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out))
            .and_then(|()| out.flush());
        if let Err(e) = written {
            tracing::warn!(event = %event.name, error = %e, "failed to write event");
        }
    }
}

/// Keeps events in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl MemorySink {
    pub fn new() -> Self { Self::default() }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn names(&self) -> Vec<String> { self.events().into_iter().map(|e| e.name).collect() }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_line_layout() {
        let event = Event::new("fetch_error")
            .at(1700000000)
            .field("gist_id", "g1")
            .field("error", "no_files_in_gist")
            .field("duration_ms", 12);

        assert_eq!(
            event.to_json_line().unwrap(),
            r#"{"ts":1700000000,"event":"fetch_error","gist_id":"g1","error":"no_files_in_gist","duration_ms":12}"#
        );

        let parsed: Value = serde_json::from_str(&event.to_json_line().unwrap()).unwrap();
        assert_eq!(parsed["event"], json!("fetch_error"));
    }

    #[test]
    fn reserved_and_repeated_keys() {
        let event = Event::new("x")
            .at(5)
            .field("ts", 99)
            .field("event", "y")
            .field("status", "started")
            .field("status", "error");

        assert_eq!(event.ts, 5);
        assert_eq!(event.name, "x");
        assert_eq!(event.fields.len(), 1);
        assert_eq!(event.get("status"), Some(&json!("error")));
    }

    #[test]
    fn null_and_escaped_values() {
        let event = Event::new("fetch_success")
            .at(1)
            .field("etag", Value::Null)
            .field("error", "quote \" and \n newline");
        let parsed: Value = serde_json::from_str(&event.to_json_line().unwrap()).unwrap();
        assert_eq!(parsed["etag"], Value::Null);
        assert_eq!(parsed["error"], json!("quote \" and \n newline"));
        assert!(!event.to_json_line().unwrap().contains('\n'));
    }

    #[test]
    fn memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.emit(&Event::new("fetch_start"));
        Arc::new(clone).emit(&Event::new("fetch_success"));
        assert_eq!(sink.names(), vec!["fetch_start", "fetch_success"]);
    }
}
