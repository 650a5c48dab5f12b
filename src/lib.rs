pub mod backend;
pub mod bridge;
pub mod console;
pub mod env;
pub mod error;
pub mod init;
pub mod json;
pub mod layer;
pub mod level;
pub mod noop;
pub mod record;

pub use backend::{Backend, BackendEvent, FieldTarget};
pub use bridge::LogBridge;
pub use error::{BridgeError, ParseSeverityError};
pub use level::{Level, Severity, ThresholdHandle};
pub use record::{AnyValue, Attribute, LogRecord, Value};
