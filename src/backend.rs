use crate::error::BridgeError;
use crate::level::Severity;
use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::time::Duration;

/// Typed field-appending surface of an in-progress backend event or of a
/// nested sub-structure inside one.
///
/// The bridge drives this trait from its attribute mapper; field order
/// follows call order within one level of nesting. `group_field` opens a
/// nested sub-structure, hands it to `fill`, then attaches it under
/// `key` — recursion depth is bounded only by the input.
pub trait FieldTarget {
    fn str_field(&mut self, key: &str, value: &str);
    fn bool_field(&mut self, key: &str, value: bool);
    fn duration_field(&mut self, key: &str, value: Duration);
    fn f64_field(&mut self, key: &str, value: f64);
    fn i64_field(&mut self, key: &str, value: i64);
    fn timestamp_field(&mut self, key: &str, value: DateTime<Utc>);
    fn u64_field(&mut self, key: &str, value: u64);

    /// Dedicated error slot. Conventionally rendered under the key
    /// `"error"`; the originating attribute's own key is not passed
    /// because the slot ignores it.
    fn error_field(&mut self, error: &(dyn StdError + 'static));

    fn group_field(&mut self, key: &str, fill: &mut dyn FnMut(&mut dyn FieldTarget));
}

/// One write-once structured event being assembled for a single
/// [`LogBridge::handle`](crate::bridge::LogBridge::handle) call.
///
/// Exclusively owned by that call's stack frame: fields are appended via
/// [`FieldTarget`], then the event is finalized exactly once with the
/// record's message, writing it to the backend's configured sinks.
pub trait BackendEvent {
    fn fields(&mut self) -> &mut dyn FieldTarget;

    /// Finalize the event, emitting it with the given message.
    ///
    /// **Returns**
    /// - `Ok(())` if the configured sink accepted the event.
    /// - `Err(..)` if the write failed. The bridge reports this to
    ///   stderr and carries on; a failed log write must not become the
    ///   caller's problem.
    fn emit(self: Box<Self>, message: &str) -> Result<(), BridgeError>;
}

/// The concrete logging backend, seen by the bridge as an opaque handle.
///
/// Implementations own the global severity threshold, the output sinks
/// and their thread-safety; the bridge only reads the threshold and
/// builds events. The crate ships three reference implementations:
/// [`ConsoleBackend`](crate::console::ConsoleBackend),
/// [`JsonBackend`](crate::json::JsonBackend) and
/// [`NoopBackend`](crate::noop::NoopBackend).
pub trait Backend: Send + Sync {
    /// Current global severity threshold. Read on every enabled-check;
    /// must be cheap.
    fn threshold(&self) -> Severity;

    /// Adjust the global threshold. For setup code and operator
    /// tooling only — the bridge itself never calls this.
    fn set_threshold(&self, severity: Severity);

    /// Start a new event at the given severity.
    fn event(&self, severity: Severity) -> Box<dyn BackendEvent + '_>;
}
