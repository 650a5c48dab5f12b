use crate::error::ParseSeverityError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Facade-side severity of a [`LogRecord`](crate::record::LogRecord).
///
/// This is the closed set the generic logging facade exposes to callers,
/// ordered `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-side severity: the domain of the backend's global threshold
/// and of the events it emits.
///
/// Wider than [`Level`] at both ends: `Trace` is finer than `Debug`,
/// `Fatal` and `Panic` are coarser than `Error`, `Off` disables output
/// entirely and `NoLevel` tags events that carry no severity at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
    NoLevel,
    Off,
}

impl Severity {
    /// Whether a backend whose threshold is `self` would emit an event
    /// at the given facade level.
    ///
    /// `Trace` and `Debug` permit all four facade levels; `Info`, `Warn`
    /// and `Error` permit their own level and coarser; `Fatal`, `Panic`,
    /// `NoLevel` and `Off` permit none (the facade cannot produce
    /// records at those severities). Constant time, no side effects —
    /// this runs on every enabled-check at every call site.
    pub fn permits(self, level: Level) -> bool {
        let floor = match self {
            Severity::Trace | Severity::Debug => Level::Debug,
            Severity::Info => Level::Info,
            Severity::Warn => Level::Warn,
            Severity::Error => Level::Error,
            Severity::Fatal | Severity::Panic | Severity::NoLevel | Severity::Off => return false,
        };
        level >= floor
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
            Severity::NoLevel => "",
            Severity::Off => "off",
        }
    }

    /// Three-letter tag used by console-style output.
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Trace => "TRC",
            Severity::Debug => "DBG",
            Severity::Info => "INF",
            Severity::Warn => "WRN",
            Severity::Error => "ERR",
            Severity::Fatal => "FTL",
            Severity::Panic => "PNC",
            Severity::NoLevel => "???",
            Severity::Off => "---",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Severity::Trace => 0,
            Severity::Debug => 1,
            Severity::Info => 2,
            Severity::Warn => 3,
            Severity::Error => 4,
            Severity::Fatal => 5,
            Severity::Panic => 6,
            Severity::NoLevel => 7,
            Severity::Off => 8,
        }
    }

    fn from_u8(raw: u8) -> Severity {
        match raw {
            0 => Severity::Trace,
            1 => Severity::Debug,
            2 => Severity::Info,
            3 => Severity::Warn,
            4 => Severity::Error,
            5 => Severity::Fatal,
            6 => Severity::Panic,
            7 => Severity::NoLevel,
            _ => Severity::Off,
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Severity {
        match level {
            Level::Debug => Severity::Debug,
            Level::Info => Severity::Info,
            Level::Warn => Severity::Warn,
            Level::Error => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Severity, ParseSeverityError> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "panic" => Ok(Severity::Panic),
            "off" | "disabled" => Ok(Severity::Off),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}

/// Cloneable handle to a backend's global severity threshold.
///
/// The threshold is process-wide mutable state owned by the backend; the
/// bridge only ever reads it. `set` exists for setup code and operator
/// tooling that adjusts verbosity at runtime.
#[derive(Debug, Clone)]
pub struct ThresholdHandle(Arc<AtomicU8>);

impl ThresholdHandle {
    pub fn new(initial: Severity) -> Self {
        ThresholdHandle(Arc::new(AtomicU8::new(initial.to_u8())))
    }

    pub fn get(&self) -> Severity {
        Severity::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, severity: Severity) {
        self.0.store(severity.to_u8(), Ordering::Relaxed);
    }
}

impl Default for ThresholdHandle {
    fn default() -> Self {
        ThresholdHandle::new(Severity::Trace)
    }
}
