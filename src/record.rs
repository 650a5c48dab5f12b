use crate::level::Level;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Capability trait for opaque `any`-kind payloads.
///
/// The bridge asks every payload one question before dispatching on its
/// kind: does it describe a failure? Payloads built with
/// [`Value::error`] answer with the error they wrap and get routed to
/// the backend's dedicated error slot; everything else falls back to its
/// `Display` text. Implement this directly only when a custom payload
/// needs to carry an error through an `any` value.
pub trait AnyValue: fmt::Debug + fmt::Display + Send + Sync {
    fn as_error(&self) -> Option<&(dyn StdError + 'static)> {
        None
    }
}

struct DisplayPayload<T>(T);

impl<T: fmt::Display + Send + Sync> fmt::Display for DisplayPayload<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: fmt::Display + Send + Sync> fmt::Debug for DisplayPayload<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: fmt::Display + Send + Sync> AnyValue for DisplayPayload<T> {}

#[derive(Debug)]
struct ErrorPayload<E>(E);

impl<E: StdError> fmt::Display for ErrorPayload<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<E: StdError + Send + Sync + 'static> AnyValue for ErrorPayload<E> {
    fn as_error(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

/// Typed value of a single [`Attribute`].
///
/// A closed tagged union: adding a kind here is a compile-time-checked
/// change in every place that dispatches on it. `Group` nests a whole
/// attribute list under one key; `Any` holds an opaque payload that is
/// either an error (see [`AnyValue`]) or stringified on output.
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Bool(bool),
    Duration(Duration),
    Float64(f64),
    Int64(i64),
    Timestamp(DateTime<Utc>),
    Uint64(u64),
    Group(Vec<Attribute>),
    Any(Arc<dyn AnyValue>),
}

impl Value {
    /// Wrap an arbitrary displayable payload as an `any` value.
    ///
    /// Output is the payload's `Display` text; structure beyond that is
    /// lost. This is accepted lossy behavior, not a bug: callers who
    /// need structure should use the typed kinds or a [`Value::Group`].
    pub fn any(payload: impl fmt::Display + Send + Sync + 'static) -> Value {
        Value::Any(Arc::new(DisplayPayload(payload)))
    }

    /// Wrap an error as an `any` value that satisfies the error
    /// capability, routing it to the backend's dedicated error slot.
    pub fn error(err: impl StdError + Send + Sync + 'static) -> Value {
        Value::Any(Arc::new(ErrorPayload(err)))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Value {
        Value::Duration(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Float64(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int64(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Value {
        Value::Timestamp(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Value {
        Value::Uint64(v)
    }
}

impl From<Vec<Attribute>> for Value {
    fn from(v: Vec<Attribute>) -> Value {
        Value::Group(v)
    }
}

/// One key/typed-value pair attached to a [`LogRecord`].
#[derive(Debug, Clone)]
pub struct Attribute {
    pub key: String,
    pub value: Value,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Attribute {
        Attribute { key: key.into(), value: value.into() }
    }

    pub fn group(key: impl Into<String>, attrs: Vec<Attribute>) -> Attribute {
        Attribute { key: key.into(), value: Value::Group(attrs) }
    }
}

/// A single leveled, attributed log call as produced by the facade.
///
/// Immutable once built; consumed by
/// [`LogBridge::handle`](crate::bridge::LogBridge::handle) and then
/// discarded. Attribute order is preserved all the way to the backend.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub attrs: Vec<Attribute>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> LogRecord {
        LogRecord {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    /// Append one attribute, builder-style.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> LogRecord {
        self.attrs.push(Attribute::new(key, value));
        self
    }

    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attribute>) {
        self.attrs.extend(attrs);
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(v) => serializer.serialize_str(v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Duration(v) => serializer.serialize_u64(v.as_millis() as u64),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::Timestamp(v) => serializer.serialize_str(&v.to_rfc3339()),
            Value::Uint64(v) => serializer.serialize_u64(*v),
            Value::Group(attrs) => {
                let mut map = serializer.serialize_map(Some(attrs.len()))?;
                for attr in attrs {
                    map.serialize_entry(&attr.key, &attr.value)?;
                }
                map.end()
            }
            Value::Any(payload) => serializer.serialize_str(&payload.to_string()),
        }
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.attrs.len()))?;
        map.serialize_entry("time", &self.timestamp.to_rfc3339())?;
        map.serialize_entry("level", &self.level)?;
        map.serialize_entry("message", &self.message)?;
        for attr in &self.attrs {
            map.serialize_entry(&attr.key, &attr.value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn error_payload_satisfies_capability() {
        let value = Value::error(io::Error::new(io::ErrorKind::Other, "bad things"));
        let Value::Any(payload) = &value else {
            panic!("expected any value");
        };
        let err = payload.as_error().expect("error capability");
        assert_eq!(err.to_string(), "bad things");
    }

    #[test]
    fn display_payload_lacks_error_capability() {
        let value = Value::any("test message");
        let Value::Any(payload) = &value else {
            panic!("expected any value");
        };
        assert!(payload.as_error().is_none());
        assert_eq!(payload.to_string(), "test message");
    }

    #[test]
    fn record_serializes_flat() {
        let mut record = LogRecord::new(Level::Info, "hello");
        record.add_attrs([
            Attribute::new("test", "test"),
            Attribute::group("a", vec![Attribute::new("b", 3_i64)]),
        ]);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["level"], "info");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["test"], "test");
        assert_eq!(json["a"]["b"], 3);
    }

    #[test]
    fn duration_serializes_as_milliseconds() {
        let json = serde_json::to_value(Value::Duration(Duration::from_secs(60))).unwrap();
        assert_eq!(json, serde_json::json!(60000));
    }
}
