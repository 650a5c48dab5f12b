/// Error types surfaced by the bridge and its reference backends.
///
/// The taxonomy is intentionally small: malformed attribute values never
/// fail (the any-fallback stringifies them) and unknown severities never
/// fail (the level mapping is total over the closed enums), so the only
/// runtime failures left are sink writes and operator-supplied severity
/// names.

/// Error returned when a backend fails to write a finalized event.
///
/// [`LogBridge::handle`](crate::bridge::LogBridge::handle) swallows this
/// (logging must not crash the caller); it is still part of the backend
/// contract so custom backends can report write failures.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("backend write failed: {0}")]
    Write(#[from] std::io::Error),

    #[error("backend rejected event: {0}")]
    Emit(String),
}

/// Error returned when parsing a severity name from configuration.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized severity name: {0:?}")]
pub struct ParseSeverityError(pub String);
