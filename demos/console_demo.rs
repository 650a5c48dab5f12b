//! Install the bridge over a console backend and log through `tracing`.
//!
//! Run with: `cargo run --example console_demo`

use std::sync::Arc;
use tracing_log_bridge::console::ConsoleBackend;
use tracing_log_bridge::init::{init_with_config, BridgeConfig};
use tracing_log_bridge::Severity;

fn main() {
    let backend = Arc::new(ConsoleBackend::stdout());
    init_with_config(
        backend,
        BridgeConfig {
            threshold: Some(Severity::Debug),
            enable_fmt: false,
        },
    );

    tracing::debug!(attempt = 1_i64, "connecting");
    tracing::info!(addr = "127.0.0.1:5432", "connected");
    tracing::warn!(latency_ms = 250_i64, "slow response");
    tracing::error!(error = "connection reset by peer", "request failed");
}
