use crate::backend::Backend;
use crate::bridge::LogBridge;
use crate::env::threshold_from_env;
use crate::layer::BridgeLayer;
use crate::level::Severity;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Setup configuration for [`init_with_config`].
///
/// **Fields**
/// - `threshold`: initial backend severity threshold. Defaults to the
///   `LOG_BRIDGE_LEVEL` environment variable when unset; when that is
///   absent too, the backend keeps whatever threshold it was built with.
/// - `enable_fmt`: when `true`, a `tracing_subscriber::fmt` layer is
///   installed alongside the bridge so events also go to the process
///   console in the default `tracing` format.
#[derive(Clone, Debug, Default)]
pub struct BridgeConfig {
    pub threshold: Option<Severity>,
    pub enable_fmt: bool,
}

/// Install a [`BridgeLayer`] over the given backend as the global
/// `tracing` subscriber.
///
/// All `tracing` events in the process are then gated and translated by
/// the bridge. Applying `config.threshold` is the one place setup code
/// writes the backend's global threshold; the bridge itself only ever
/// reads it.
pub fn init_with_config(backend: Arc<dyn Backend>, config: BridgeConfig) {
    if let Some(threshold) = config.threshold.or_else(threshold_from_env) {
        backend.set_threshold(threshold);
    }

    let layer = BridgeLayer::new(LogBridge::new(backend));

    if config.enable_fmt {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    }
}

/// Install the bridge with default configuration. The recommended
/// entrypoint for typical services.
pub fn init(backend: Arc<dyn Backend>) {
    init_with_config(backend, BridgeConfig::default());
}
