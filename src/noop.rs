use crate::backend::{Backend, BackendEvent, FieldTarget};
use crate::error::BridgeError;
use crate::json::JsonFields;
use crate::level::{Severity, ThresholdHandle};

/// A backend that discards every event.
///
/// Useful for measuring the overhead of the bridge itself without any
/// I/O, and for unit tests that don't care about output.
#[derive(Debug, Default)]
pub struct NoopBackend {
    threshold: ThresholdHandle,
}

impl NoopBackend {
    pub fn new() -> NoopBackend {
        NoopBackend::default()
    }
}

impl Backend for NoopBackend {
    fn threshold(&self) -> Severity {
        self.threshold.get()
    }

    fn set_threshold(&self, severity: Severity) {
        self.threshold.set(severity);
    }

    fn event(&self, _severity: Severity) -> Box<dyn BackendEvent + '_> {
        Box::new(NoopEvent { fields: JsonFields::new() })
    }
}

struct NoopEvent {
    // Fields are still collected so field-side bugs surface in tests
    // that run against this backend, then thrown away on emit.
    fields: JsonFields,
}

impl BackendEvent for NoopEvent {
    fn fields(&mut self) -> &mut dyn FieldTarget {
        &mut self.fields
    }

    fn emit(self: Box<Self>, _message: &str) -> Result<(), BridgeError> {
        Ok(())
    }
}
