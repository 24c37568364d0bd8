//! Kibana sidecar entry point.
//!
//! Responsibilities:
//! - Load configuration from `.env`, the environment and flags.
//! - Initialize logging, tracing and the optional metrics exporter.
//! - Probe Elasticsearch once, then run the ConfigMap watch until a
//!   termination signal arrives.
//!
//! Does NOT handle:
//! - Reconciliation logic (see [`kibana_sidecar::reconcile`]).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE flag parsing.
//! - Any startup failure exits with status 1; once the watch runs, the
//!   process only stops on SIGINT or SIGTERM.

mod args;

use std::time::Duration;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use kibana_sidecar::{KubeEventSource, Reconciler, SyncContext};
use sidecar_client::{ElasticClient, MetricsCollector, MetricsExporter, TelemetryConfig};
use sidecar_config::{Config, ConfigLoader, load_default_actions};
use tracing::{error, info};

const EXIT_FAILURE: i32 = 1;

#[tokio::main]
async fn main() {
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(EXIT_FAILURE);
    }

    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build configuration: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let telemetry = match TelemetryConfig::from_logging(&config.logging).init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let code = match run(config).await {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Sidecar failed to start");
            EXIT_FAILURE
        }
    };

    telemetry.shutdown();
    std::process::exit(code);
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut loader = ConfigLoader::new()
        .from_env()
        .context("Failed to load configuration from environment")?;

    if let Some(ref label) = cli.label {
        loader = loader.with_label(label.clone());
    }
    if let Some(ref label) = cli.generate_id_label {
        loader = loader.with_generate_id_label(label.clone());
    }
    if let Some(ref url) = cli.kibana_base_url {
        loader = loader.with_kibana_base_url(url.clone());
    }
    if let Some(ref url) = cli.elasticsearch_base_url {
        loader = loader.with_elasticsearch_base_url(url.clone());
    }
    if let Some(ref namespace) = cli.namespace {
        loader = loader.with_namespace(namespace.clone());
    }
    if let Some(ref path) = cli.default_actions {
        loader = loader.with_default_actions_path(path.clone());
    }
    if let Some(secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(secs));
    }
    if let Some(retries) = cli.max_retries {
        loader = loader.with_max_retries(retries);
    }
    if let Some(secs) = cli.watch_retry_interval {
        loader = loader.with_watch_retry_interval(Duration::from_secs(secs));
    }
    if cli.skip_verify {
        loader = loader.with_skip_verify(true);
    }
    if let Some(ref level) = cli.log_level {
        loader = loader.with_log_level(level.clone());
    }
    if let Some(format) = cli.log_format {
        loader = loader.with_log_format(format);
    }
    if let Some(ref bind) = cli.metrics_bind {
        loader = loader.with_metrics_bind(bind.clone());
    }
    if let Some(ref endpoint) = cli.otlp_endpoint {
        loader = loader.with_otlp_endpoint(endpoint.clone());
    }

    loader.build().context("Invalid configuration")
}

async fn run(config: Config) -> Result<()> {
    let _metrics_exporter = match config.logging.metrics_bind {
        Some(ref bind) => {
            let exporter = MetricsExporter::install(bind)
                .with_context(|| format!("Failed to start metrics exporter on {}", bind))?;
            info!(bind = %exporter.bind_addr(), "Metrics exporter started");
            Some(exporter)
        }
        None => None,
    };
    let metrics = if config.logging.metrics_bind.is_some() {
        MetricsCollector::new()
    } else {
        MetricsCollector::disabled()
    };

    let default_actions = load_default_actions(config.default_actions_path.as_deref())
        .context("Failed to load default watcher actions")?;

    let client = ElasticClient::builder()
        .from_config(&config)
        .metrics(metrics.clone())
        .build()
        .context("Failed to build Kibana/Elasticsearch client")?;

    let (version, watcher_api) = client
        .detect_watcher_api()
        .await
        .context("Failed to determine Elasticsearch version")?;
    info!(version = %version.number(), api = ?watcher_api, "Selected watcher API");

    let kube = kube::Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    let source = KubeEventSource::new(kube, &config.watch.namespace);

    let ctx = SyncContext::new(&config, watcher_api, default_actions, client).with_metrics(metrics);
    let reconciler = Reconciler::new(ctx);

    info!(label = %config.watch.label, namespace = %config.watch.namespace, "Starting ConfigMap watch");
    reconciler.run(&source, shutdown_signal()).await;
    info!("Sidecar stopped");
    Ok(())
}

/// Resolves on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
