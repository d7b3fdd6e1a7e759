//! Tracing setup for processes hosting event bridges.
//!
//! Call [`init_tracing`] once at startup, before the first bridge is built,
//! so registration and teardown logs from every subsystem are captured.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | OTLP collector base URL (e.g. `http://localhost:4318`). Enables span export over HTTP. |
//! | `RUST_LOG` | Log filter (default `"info"`). Use `mechbridge_core=trace` to see suppressed late deliveries. |
//! | `MECHBRIDGE_LOG_FORMAT=json` | Emit newline-delimited JSON logs regardless of the config file. |
//!
//! # Example
//!
//! ```rust,no_run
//! use mechbridge_runtime::{BridgeConfig, telemetry::init_tracing};
//!
//! let _guard = init_tracing(&BridgeConfig::default());
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{BridgeConfig, LogFormat};

/// Install the global subscriber described by `config`.
///
/// Returns a guard that flushes exported spans when dropped; hold it in
/// `main`.  Calling this twice in one process is a no-op the second time.
pub fn init_tracing(config: &BridgeConfig) -> TracerProviderGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = effective_format(config.log_format, std::env::var("MECHBRIDGE_LOG_FORMAT").ok());
    let provider = build_provider(&config.service_name);
    let otel_layer = provider.as_ref().map(|p| {
        tracing_opentelemetry::layer().with_tracer(p.tracer("mechbridge"))
    });

    let registry = tracing_subscriber::registry().with(env_filter).with(otel_layer);
    let installed = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
    };
    if let Err(e) = installed {
        eprintln!("[mechbridge] tracing subscriber already installed: {e}");
    }

    TracerProviderGuard(provider)
}

/// `MECHBRIDGE_LOG_FORMAT=json` wins over the configured format.
fn effective_format(configured: LogFormat, env: Option<String>) -> LogFormat {
    match env.as_deref() {
        Some("json") => LogFormat::Json,
        _ => configured,
    }
}

/// Shuts the OTel provider down on drop, flushing pending spans.
pub struct TracerProviderGuard(Option<SdkTracerProvider>);

impl TracerProviderGuard {
    /// `true` when spans are being exported.
    pub fn is_exporting(&self) -> bool {
        self.0.is_some()
    }
}

impl Drop for TracerProviderGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.0.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("[mechbridge] OpenTelemetry provider shutdown error: {e}");
        }
    }
}

/// Build a provider when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
fn build_provider(service_name: &str) -> Option<SdkTracerProvider> {
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| eprintln!("[mechbridge] OTLP exporter init failed: {e}"))
        .ok()?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    // Simple exporter: bridges run on plain threads, no async runtime exists.
    Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            .with_simple_exporter(exporter)
            .build(),
    )
}
