use crate::bridge::LogBridge;
use crate::level::Level;
use crate::record::{Attribute, LogRecord, Value};
use chrono::Utc;
use std::error::Error as StdError;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that feeds events through a [`LogBridge`].
///
/// This is the facade glue: each `tracing` event is gated through
/// [`LogBridge::enabled`] at its mapped level, converted into a
/// [`LogRecord`] with a field visitor, and handed to
/// [`LogBridge::handle`]. Everything runs synchronously on the thread
/// that emitted the event; span context stays ambient and is not
/// interpreted here.
pub struct BridgeLayer {
    bridge: LogBridge,
}

impl BridgeLayer {
    pub fn new(bridge: LogBridge) -> BridgeLayer {
        BridgeLayer { bridge }
    }
}

/// Map a `tracing` level onto the facade's closed level set. The facade
/// has nothing finer than `Debug`, so `TRACE` coarsens to it.
fn facade_level(level: &tracing::Level) -> Level {
    if *level == tracing::Level::ERROR {
        Level::Error
    } else if *level == tracing::Level::WARN {
        Level::Warn
    } else if *level == tracing::Level::INFO {
        Level::Info
    } else {
        Level::Debug
    }
}

impl<S> Layer<S> for BridgeLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = facade_level(event.metadata().level());
        if !self.bridge.enabled(level) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord {
            timestamp: Utc::now(),
            level,
            message: visitor.message.unwrap_or_default(),
            attrs: visitor.attrs,
        };

        if let Err(err) = self.bridge.handle(&record) {
            eprintln!("log bridge: failed to handle event: {err}");
        }
    }
}

/// Visitor that turns `tracing` event fields into facade attributes,
/// pulling the conventional `message` field out as the record message.
#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    attrs: Vec<Attribute>,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.attrs.push(Attribute::new(field.name(), value));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.attrs.push(Attribute::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.attrs.push(Attribute::new(field.name(), value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.attrs.push(Attribute::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.attrs.push(Attribute::new(field.name(), value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn StdError + 'static)) {
        // The borrowed error cannot outlive the event; capture its
        // message in an owned payload that keeps the error capability.
        self.attrs.push(Attribute::new(
            field.name(),
            Value::error(CapturedError(value.to_string())),
        ));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.attrs.push(Attribute::new(field.name(), Value::any(format!("{value:?}"))));
        }
    }
}

#[derive(Debug)]
struct CapturedError(String);

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for CapturedError {}
