use crate::backend::{Backend, FieldTarget};
use crate::error::BridgeError;
use crate::level::Level;
use crate::record::{Attribute, LogRecord, Value};
use std::sync::Arc;

/// Preset attributes accumulated at one group-nesting depth via
/// [`LogBridge::with_group`] / [`LogBridge::with_attrs`].
#[derive(Debug, Clone)]
struct GroupScope {
    name: String,
    attrs: Vec<Attribute>,
}

/// The bridge between the logging facade and a structured backend.
///
/// Holds a shared handle to the backend plus any preset attributes and
/// open group scopes; no other state. Stateless per call and safe to
/// share across threads — `handle` runs synchronously on the caller's
/// thread and never suspends, so a slow backend sink blocks the caller
/// for the duration of the call.
#[derive(Clone)]
pub struct LogBridge {
    backend: Arc<dyn Backend>,
    preset: Vec<Attribute>,
    groups: Vec<GroupScope>,
}

impl LogBridge {
    pub fn new(backend: Arc<dyn Backend>) -> LogBridge {
        LogBridge {
            backend,
            preset: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Whether the backend's current global threshold permits records at
    /// `level`. No side effects; called on every log call site.
    pub fn enabled(&self, level: Level) -> bool {
        self.backend.threshold().permits(level)
    }

    /// Translate one record into exactly one finalized backend event.
    ///
    /// Starts an event at the mapped severity, appends preset and
    /// group-scoped attributes, then the record's attributes in record
    /// order, and finalizes with the record's message. Does not re-check
    /// [`enabled`](Self::enabled): gating is the facade's job, and the
    /// two calls are decoupled by contract.
    ///
    /// Emission is fire-and-forget: a sink write failure is reported to
    /// stderr and swallowed, so the normal path always returns `Ok`.
    pub fn handle(&self, record: &LogRecord) -> Result<(), BridgeError> {
        let mut event = self.backend.event(record.level.into());

        let fields = event.fields();
        for attr in &self.preset {
            append_attr(fields, attr);
        }
        append_grouped(fields, &self.groups, &record.attrs);

        if let Err(err) = event.emit(&record.message) {
            eprintln!("log bridge: dropping event, backend emit failed: {err}");
        }
        Ok(())
    }

    /// Return a bridge that attaches `attrs` ahead of every record's own
    /// attributes, inside the currently open group if there is one.
    /// Pure delegation; no translation logic.
    pub fn with_attrs(&self, attrs: Vec<Attribute>) -> LogBridge {
        let mut next = self.clone();
        match next.groups.last_mut() {
            Some(scope) => scope.attrs.extend(attrs),
            None => next.preset.extend(attrs),
        }
        next
    }

    /// Return a bridge that nests all later preset and record attributes
    /// under `name`. An empty name adds no nesting.
    pub fn with_group(&self, name: &str) -> LogBridge {
        if name.is_empty() {
            return self.clone();
        }
        let mut next = self.clone();
        next.groups.push(GroupScope { name: name.to_string(), attrs: Vec::new() });
        next
    }
}

fn append_grouped(target: &mut dyn FieldTarget, groups: &[GroupScope], attrs: &[Attribute]) {
    match groups.split_first() {
        None => {
            for attr in attrs {
                append_attr(target, attr);
            }
        }
        Some((scope, rest)) => {
            target.group_field(&scope.name, &mut |inner| {
                for attr in &scope.attrs {
                    append_attr(inner, attr);
                }
                append_grouped(inner, rest, attrs);
            });
        }
    }
}

/// Append one attribute to a field target, recursing through groups.
///
/// The error capability query runs first and wins over kind dispatch:
/// an `any` payload that describes a failure lands in the backend's
/// dedicated error slot and its own key is ignored. Everything else is
/// a closed match over [`Value`]; `any` payloads without the error
/// capability are stringified.
pub(crate) fn append_attr(target: &mut dyn FieldTarget, attr: &Attribute) {
    if let Value::Any(payload) = &attr.value {
        if let Some(err) = payload.as_error() {
            target.error_field(err);
            return;
        }
    }

    match &attr.value {
        Value::String(v) => target.str_field(&attr.key, v),
        Value::Bool(v) => target.bool_field(&attr.key, *v),
        Value::Duration(v) => target.duration_field(&attr.key, *v),
        Value::Float64(v) => target.f64_field(&attr.key, *v),
        Value::Int64(v) => target.i64_field(&attr.key, *v),
        Value::Timestamp(v) => target.timestamp_field(&attr.key, *v),
        Value::Uint64(v) => target.u64_field(&attr.key, *v),
        Value::Group(children) => {
            target.group_field(&attr.key, &mut |inner| {
                for child in children {
                    append_attr(inner, child);
                }
            });
        }
        Value::Any(payload) => target.str_field(&attr.key, &payload.to_string()),
    }
}
