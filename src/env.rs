//! Environment variable helpers for configuring the bridge from
//! services.
//!
//! These are purely helpers; the core types remain decoupled from
//! environment access.

use crate::level::Severity;

/// Initial backend severity threshold, e.g. `info` or `off`.
pub const LOG_BRIDGE_LEVEL_ENV: &str = "LOG_BRIDGE_LEVEL";

/// Read the threshold from [`LOG_BRIDGE_LEVEL_ENV`], if set and valid.
pub fn threshold_from_env() -> Option<Severity> {
    let raw = std::env::var(LOG_BRIDGE_LEVEL_ENV).ok()?;
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_validates_the_variable() {
        std::env::set_var(LOG_BRIDGE_LEVEL_ENV, "warn");
        assert_eq!(threshold_from_env(), Some(Severity::Warn));

        std::env::set_var(LOG_BRIDGE_LEVEL_ENV, "nonsense");
        assert_eq!(threshold_from_env(), None);

        std::env::remove_var(LOG_BRIDGE_LEVEL_ENV);
        assert_eq!(threshold_from_env(), None);
    }
}
