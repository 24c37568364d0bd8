//! Logging and OpenTelemetry initialization.
//!
//! Installs the global `tracing` subscriber: an `EnvFilter`, a fmt layer
//! writing JSON or text lines, and an optional OTLP trace exporter.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sidecar_client::TelemetryConfig;
//!
//! let guard = TelemetryConfig::from_logging(&config.logging).init()?;
//! // Run the sidecar...
//! guard.shutdown(); // Flush spans before exit
//! ```
//!
//! # Invariants
//! - `RUST_LOG`, when set, overrides the configured level.
//! - Initialization happens at most once per process; a second call errors.

use std::time::Duration;

use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use sidecar_config::constants::SERVICE_NAME;
use sidecar_config::{LogFormat, LoggingConfig};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging and OpenTelemetry tracing.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default `tracing` level directive when `RUST_LOG` is unset
    pub level: String,
    /// Log line format
    pub format: LogFormat,
    /// OTLP endpoint (e.g., "http://localhost:4317" for Jaeger/Tempo)
    pub otlp_endpoint: Option<String>,
    /// Service name for trace attribution
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Export timeout for the OTLP exporter
    pub timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from_logging(&LoggingConfig::default())
    }
}

impl TelemetryConfig {
    /// Derive telemetry settings from the loaded logging configuration.
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self {
            level: logging.level.clone(),
            format: logging.format,
            otlp_endpoint: logging.otlp_endpoint.clone(),
            service_name: SERVICE_NAME.to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Builder method to set OTLP endpoint.
    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    /// Builder method to set the log format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Filter used when `RUST_LOG` is not set.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber.
    ///
    /// # Returns
    /// A guard that must be held until shutdown so pending spans are flushed.
    ///
    /// # Errors
    /// Returns an error if the OTLP pipeline fails to build or a global
    /// subscriber is already installed.
    pub fn init(&self) -> Result<TelemetryGuard, TelemetryError> {
        let provider = match self.otlp_endpoint {
            Some(ref endpoint) => Some(self.create_tracer_provider(endpoint)?),
            None => None,
        };

        let otel_layer = provider.as_ref().map(|p| {
            tracing_opentelemetry::layer().with_tracer(p.tracer(self.service_name.clone()))
        });

        let registry = tracing_subscriber::registry()
            .with(self.env_filter())
            .with(otel_layer);

        let result = match self.format {
            LogFormat::Json => registry.with(json_layer(std::io::stdout)).try_init(),
            LogFormat::Text => registry.with(fmt::layer().with_target(true)).try_init(),
        };
        result.map_err(|e| TelemetryError::InitError(e.to_string()))?;

        Ok(TelemetryGuard { provider })
    }

    fn create_tracer_provider(&self, endpoint: &str) -> Result<SdkTracerProvider, TelemetryError> {
        use opentelemetry_otlp::{Protocol, WithExportConfig};
        use opentelemetry_sdk::trace::{BatchConfig, BatchSpanProcessor, Sampler};

        let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .with_timeout(self.timeout)
            .with_protocol(Protocol::Grpc)
            .build()
            .map_err(|e| TelemetryError::InitError(e.to_string()))?;

        let batch_processor = BatchSpanProcessor::builder(otlp_exporter)
            .with_batch_config(BatchConfig::default())
            .build();

        let resource = opentelemetry_sdk::Resource::builder()
            .with_attributes(vec![
                opentelemetry::KeyValue::new("service.name", self.service_name.clone()),
                opentelemetry::KeyValue::new("service.version", self.service_version.clone()),
            ])
            .build();

        let provider = SdkTracerProvider::builder()
            .with_span_processor(batch_processor)
            .with_resource(resource)
            .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
            .build();

        Ok(provider)
    }
}

/// One JSON object per line with event fields flattened to the top level
/// next to `timestamp`, `level`, `target` and `message`.
fn json_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .flatten_event(true)
        .with_target(true)
        .with_writer(writer)
}

/// Guard that holds tracer resources until shutdown.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether an OTLP exporter is active.
    pub fn exports_traces(&self) -> bool {
        self.provider.is_some()
    }

    /// Shutdown the tracer and flush any pending spans.
    pub fn shutdown(&self) {
        if let Some(ref provider) = self.provider
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to flush traces: {}", e);
        }
    }
}

/// Errors that can occur during telemetry initialization.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to initialize telemetry: {0}")]
    InitError(String),
}

/// Propagate the current span context to an outgoing request.
///
/// Injects a W3C `traceparent` header for the current `tracing` span. Without
/// an OpenTelemetry layer or an entered span this adds nothing.
pub fn inject_trace_context(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    use opentelemetry::propagation::TextMapPropagator;
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use std::collections::HashMap;
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    let propagator = TraceContextPropagator::new();
    let mut headers = HashMap::new();

    propagator.inject_context(&tracing::Span::current().context(), &mut headers);

    let mut result = builder;
    for (key, value) in headers {
        result = result.header(key, value);
    }
    result
}
