use crate::backend::{Backend, BackendEvent, FieldTarget};
use crate::error::BridgeError;
use crate::json::JsonFields;
use crate::level::{Severity, ThresholdHandle};
use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Human-readable console backend.
///
/// Renders one line per event in the form
/// `{timestamp} {TAG} {message} key=value ...`: strings are printed bare
/// unless they need quoting, durations as millisecond numbers,
/// timestamps as RFC3339 and nested groups as compact JSON objects. The
/// severity tag is colored unless [`no_color`](Self::no_color) is set.
pub struct ConsoleBackend<W> {
    writer: Mutex<W>,
    threshold: ThresholdHandle,
    no_color: bool,
}

impl ConsoleBackend<std::io::Stdout> {
    pub fn stdout() -> ConsoleBackend<std::io::Stdout> {
        ConsoleBackend::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleBackend<W> {
    pub fn new(writer: W) -> ConsoleBackend<W> {
        ConsoleBackend {
            writer: Mutex::new(writer),
            threshold: ThresholdHandle::default(),
            no_color: false,
        }
    }

    /// Disable ANSI colors, e.g. when the destination is a file or a
    /// test buffer.
    pub fn no_color(mut self) -> ConsoleBackend<W> {
        self.no_color = true;
        self
    }

    pub fn threshold_handle(&self) -> ThresholdHandle {
        self.threshold.clone()
    }
}

impl<W: Write + Send> Backend for ConsoleBackend<W> {
    fn threshold(&self) -> Severity {
        self.threshold.get()
    }

    fn set_threshold(&self, severity: Severity) {
        self.threshold.set(severity);
    }

    fn event(&self, severity: Severity) -> Box<dyn BackendEvent + '_> {
        Box::new(ConsoleEvent {
            backend: self,
            severity,
            fields: ConsoleFields::default(),
        })
    }
}

/// Rendered `key=value` pairs in append order.
#[derive(Default)]
struct ConsoleFields {
    pairs: Vec<(String, String)>,
}

/// Quote a string value the way console output expects: bare when it is
/// a single printable token, double-quoted otherwise.
fn render_str(value: &str) -> String {
    let needs_quoting =
        value.is_empty() || value.contains(|c: char| c.is_whitespace() || c == '"' || c == '=');
    if needs_quoting {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}

fn render_millis(value: Duration) -> String {
    let millis = value.as_secs_f64() * 1000.0;
    format!("{millis}")
}

impl FieldTarget for ConsoleFields {
    fn str_field(&mut self, key: &str, value: &str) {
        self.pairs.push((key.to_string(), render_str(value)));
    }

    fn bool_field(&mut self, key: &str, value: bool) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    fn duration_field(&mut self, key: &str, value: Duration) {
        self.pairs.push((key.to_string(), render_millis(value)));
    }

    fn f64_field(&mut self, key: &str, value: f64) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    fn i64_field(&mut self, key: &str, value: i64) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    fn timestamp_field(&mut self, key: &str, value: DateTime<Utc>) {
        self.pairs.push((key.to_string(), value.to_rfc3339()));
    }

    fn u64_field(&mut self, key: &str, value: u64) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    fn error_field(&mut self, error: &(dyn StdError + 'static)) {
        self.pairs.push(("error".to_string(), render_str(&error.to_string())));
    }

    fn group_field(&mut self, key: &str, fill: &mut dyn FnMut(&mut dyn FieldTarget)) {
        // Nested structures render as compact JSON.
        let mut child = JsonFields::new();
        fill(&mut child);
        self.pairs.push((key.to_string(), child.into_value().to_string()));
    }
}

struct ConsoleEvent<'a, W> {
    backend: &'a ConsoleBackend<W>,
    severity: Severity,
    fields: ConsoleFields,
}

fn colored_tag(severity: Severity) -> String {
    let code = match severity {
        Severity::Trace | Severity::Debug => "36",
        Severity::Info => "32",
        Severity::Warn => "33",
        Severity::Error | Severity::Fatal | Severity::Panic => "31",
        Severity::NoLevel | Severity::Off => return severity.tag().to_string(),
    };
    format!("\x1b[{code}m{}\x1b[0m", severity.tag())
}

impl<W: Write + Send> BackendEvent for ConsoleEvent<'_, W> {
    fn fields(&mut self) -> &mut dyn FieldTarget {
        &mut self.fields
    }

    fn emit(self: Box<Self>, message: &str) -> Result<(), BridgeError> {
        let tag = if self.backend.no_color {
            self.severity.tag().to_string()
        } else {
            colored_tag(self.severity)
        };

        let mut line = format!("{} {tag}", Utc::now().to_rfc3339());
        if !message.is_empty() {
            line.push(' ');
            line.push_str(message);
        }
        for (key, value) in &self.fields.pairs {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }

        let mut writer = match self.backend.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_strings_stay_bare() {
        assert_eq!(render_str("test"), "test");
        assert_eq!(render_str("60000"), "60000");
    }

    #[test]
    fn strings_with_spaces_are_quoted() {
        assert_eq!(render_str("test message"), "\"test message\"");
        assert_eq!(render_str(""), "\"\"");
    }

    #[test]
    fn whole_durations_render_without_fraction() {
        assert_eq!(render_millis(Duration::from_secs(60)), "60000");
        assert_eq!(render_millis(Duration::from_micros(1500)), "1.5");
    }
}
