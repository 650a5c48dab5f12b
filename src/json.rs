use crate::backend::{Backend, BackendEvent, FieldTarget};
use crate::error::BridgeError;
use crate::level::{Severity, ThresholdHandle};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as Json};
use std::error::Error as StdError;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// [`FieldTarget`] that accumulates fields into a JSON object,
/// preserving append order.
///
/// Shared by [`JsonBackend`] events and by
/// [`ConsoleBackend`](crate::console::ConsoleBackend) for rendering
/// nested groups as compact JSON.
#[derive(Debug, Default)]
pub struct JsonFields {
    map: Map<String, Json>,
}

impl JsonFields {
    pub fn new() -> JsonFields {
        JsonFields::default()
    }

    pub fn into_value(self) -> Json {
        Json::Object(self.map)
    }

    pub(crate) fn into_map(self) -> Map<String, Json> {
        self.map
    }
}

impl FieldTarget for JsonFields {
    fn str_field(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), Json::from(value));
    }

    fn bool_field(&mut self, key: &str, value: bool) {
        self.map.insert(key.to_string(), Json::from(value));
    }

    fn duration_field(&mut self, key: &str, value: Duration) {
        // Millisecond precision, whole number where possible.
        let millis = value.as_secs_f64() * 1000.0;
        let json = if millis.fract() == 0.0 {
            Json::from(millis as u64)
        } else {
            Json::from(millis)
        };
        self.map.insert(key.to_string(), json);
    }

    fn f64_field(&mut self, key: &str, value: f64) {
        self.map.insert(key.to_string(), Json::from(value));
    }

    fn i64_field(&mut self, key: &str, value: i64) {
        self.map.insert(key.to_string(), Json::from(value));
    }

    fn timestamp_field(&mut self, key: &str, value: DateTime<Utc>) {
        self.map.insert(key.to_string(), Json::from(value.to_rfc3339()));
    }

    fn u64_field(&mut self, key: &str, value: u64) {
        self.map.insert(key.to_string(), Json::from(value));
    }

    fn error_field(&mut self, error: &(dyn StdError + 'static)) {
        self.map.insert("error".to_string(), Json::from(error.to_string()));
    }

    fn group_field(&mut self, key: &str, fill: &mut dyn FnMut(&mut dyn FieldTarget)) {
        let mut child = JsonFields::new();
        fill(&mut child);
        self.map.insert(key.to_string(), child.into_value());
    }
}

/// Backend that writes one JSON object per event, line by line.
///
/// **Parameters**
/// - `writer`: destination for the JSON lines; guarded by a `Mutex`, so
///   concurrent emits serialize on the lock.
///
/// The threshold handle defaults to `Trace` (everything enabled) and can
/// be shared with operator tooling via [`threshold_handle`](Self::threshold_handle).
pub struct JsonBackend<W> {
    writer: Mutex<W>,
    threshold: ThresholdHandle,
}

impl<W: Write + Send> JsonBackend<W> {
    pub fn new(writer: W) -> JsonBackend<W> {
        JsonBackend {
            writer: Mutex::new(writer),
            threshold: ThresholdHandle::default(),
        }
    }

    pub fn threshold_handle(&self) -> ThresholdHandle {
        self.threshold.clone()
    }
}

impl<W: Write + Send> Backend for JsonBackend<W> {
    fn threshold(&self) -> Severity {
        self.threshold.get()
    }

    fn set_threshold(&self, severity: Severity) {
        self.threshold.set(severity);
    }

    fn event(&self, severity: Severity) -> Box<dyn BackendEvent + '_> {
        Box::new(JsonEvent {
            writer: &self.writer,
            severity,
            fields: JsonFields::new(),
        })
    }
}

struct JsonEvent<'a, W> {
    writer: &'a Mutex<W>,
    severity: Severity,
    fields: JsonFields,
}

impl<W: Write + Send> BackendEvent for JsonEvent<'_, W> {
    fn fields(&mut self) -> &mut dyn FieldTarget {
        &mut self.fields
    }

    fn emit(self: Box<Self>, message: &str) -> Result<(), BridgeError> {
        let mut map = Map::new();
        map.insert("level".to_string(), Json::from(self.severity.as_str()));
        map.insert("time".to_string(), Json::from(Utc::now().to_rfc3339()));
        map.insert("message".to_string(), Json::from(message));
        map.extend(self.fields.into_map());

        let line = Json::Object(map).to_string();
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(writer, "{line}")?;
        Ok(())
    }
}
