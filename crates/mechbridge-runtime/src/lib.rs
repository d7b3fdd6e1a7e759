//! `mechbridge-runtime` – Host Process Wiring
//!
//! Everything a host process needs around the bridges themselves.
//!
//! # Modules
//!
//! - [`config`] – [`BridgeConfig`]: TOML configuration with defaults and
//!   `MECHBRIDGE_*` environment overrides.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: `tracing`
//!   subscriber with compact or JSON output and optional OTLP export.
//!
//! [`host_context_from_config`] turns a config into the
//! [`HostContext`] every bridge of the process should share.

pub mod config;
pub mod telemetry;

pub use config::{BridgeConfig, LogFormat};

use mechbridge_core::{DeliveryMode, HostContext};
use mechbridge_types::BridgeError;
use tracing::info;

/// Build the host context selected by `config`.
///
/// Inline mode returns the process-wide [`HostContext::global`]; channel
/// mode starts a dedicated executor thread.
///
/// # Errors
///
/// Returns [`BridgeError::Executor`] when the executor thread cannot be
/// started.
pub fn host_context_from_config(config: &BridgeConfig) -> Result<HostContext, BridgeError> {
    let context = HostContext::from_mode(config.delivery, &config.executor_thread_name)?;
    match config.delivery {
        DeliveryMode::Inline => info!(mode = %config.delivery, "using global host context"),
        DeliveryMode::Channel => info!(
            mode = %config.delivery,
            executor = %config.executor_thread_name,
            "host executor started"
        ),
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn inline_config_shares_global_context() {
        let context = host_context_from_config(&BridgeConfig::default()).unwrap();
        assert_eq!(context.mode(), DeliveryMode::Inline);
        assert!(context.same_as(&HostContext::global()));
    }

    #[test]
    fn channel_config_runs_jobs_on_named_executor() {
        let cfg = BridgeConfig {
            delivery: DeliveryMode::Channel,
            executor_thread_name: "runtime-test-host".to_string(),
            ..Default::default()
        };
        let context = host_context_from_config(&cfg).unwrap();
        let on_executor = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&on_executor);

        context.execute(move || {
            let name = std::thread::current().name().map(str::to_owned);
            flag.store(name.as_deref() == Some("runtime-test-host"), Ordering::SeqCst);
        });
        context.flush();

        assert_eq!(context.mode(), DeliveryMode::Channel);
        assert!(on_executor.load(Ordering::SeqCst));
    }
}
