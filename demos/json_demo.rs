//! Drive the bridge directly with hand-built records against the
//! JSON-lines backend, including nested groups and an error payload.
//!
//! Run with: `cargo run --example json_demo`

use std::sync::Arc;
use std::time::Duration;
use tracing_log_bridge::json::JsonBackend;
use tracing_log_bridge::{Attribute, Level, LogBridge, LogRecord, Value};

fn main() {
    let backend = Arc::new(JsonBackend::new(std::io::stdout()));
    let bridge = LogBridge::new(backend).with_attrs(vec![Attribute::new("service", "demo")]);

    let record = LogRecord::new(Level::Info, "request finished")
        .attr("elapsed", Duration::from_millis(42))
        .attr(
            "request",
            vec![
                Attribute::new("method", "GET"),
                Attribute::new("path", "/health"),
            ],
        );
    let _ = bridge.handle(&record);

    let record = LogRecord::new(Level::Error, "request failed").attr(
        "cause",
        Value::error(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )),
    );
    let _ = bridge.handle(&record);
}
