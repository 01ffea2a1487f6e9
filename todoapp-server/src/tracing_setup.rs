//! Tracing setup for the server
//!
//! Console output is always on; `--otel` adds an OTLP span exporter when
//! the binary is built with the `telemetry` feature. The exporter reads
//! `OTEL_EXPORTER_OTLP_ENDPOINT` itself (default http://localhost:4317).
//! `RUST_LOG` overrides the `--debug` level.

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const SERVICE_NAME: &str = "todoapp";

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    pub debug: bool,
    pub otel: bool,
}

fn env_filter(config: &TracingConfig) -> EnvFilter {
    let fallback = if config.debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &TracingConfig) -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt_layer)
        .with(otel::layer(config.otel)?)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::debug!(service = SERVICE_NAME, otel = config.otel, "tracing initialized");
    Ok(())
}

/// Flush pending spans
pub fn shutdown_otel() {
    otel::shutdown();
}

#[cfg(feature = "telemetry")]
mod otel {
    use anyhow::{anyhow, Result};
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::trace::{Tracer, TracerProvider};
    use opentelemetry_sdk::Resource;
    use tracing::Subscriber;
    use tracing_opentelemetry::OpenTelemetryLayer;
    use tracing_subscriber::registry::LookupSpan;

    use super::SERVICE_NAME;

    pub(super) fn layer<S>(enabled: bool) -> Result<Option<OpenTelemetryLayer<S, Tracer>>>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        if !enabled {
            return Ok(None);
        }

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .build()
            .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
            .with_resource(Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]))
            .build();
        let tracer = provider.tracer(SERVICE_NAME);

        // Dropping the provider would stop export
        let _ = opentelemetry::global::set_tracer_provider(provider);

        Ok(Some(tracing_opentelemetry::layer().with_tracer(tracer)))
    }

    pub(super) fn shutdown() {
        opentelemetry::global::shutdown_tracer_provider();
    }
}

#[cfg(not(feature = "telemetry"))]
mod otel {
    use anyhow::{bail, Result};
    use tracing_subscriber::layer::Identity;

    pub(super) fn layer(enabled: bool) -> Result<Option<Identity>> {
        if enabled {
            bail!("--otel requires a build with the `telemetry` feature");
        }
        Ok(None)
    }

    pub(super) fn shutdown() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_installs_once() {
        let config = TracingConfig::default();
        init(&config).unwrap();
        assert!(init(&config).is_err());
    }

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn otel_without_feature_is_rejected() {
        assert!(otel::layer(true).is_err());
        assert!(otel::layer(false).unwrap().is_none());
    }
}
