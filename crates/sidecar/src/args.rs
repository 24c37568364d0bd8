//! Command-line overrides for the sidecar.
//!
//! Every setting is primarily read from the environment by
//! [`sidecar_config::ConfigLoader`]; flags given here take precedence.

use std::path::PathBuf;

use clap::Parser;
use sidecar_config::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "kibana-sidecar")]
#[command(
    about = "Sync Kibana saved objects and Elasticsearch watches from labelled ConfigMaps",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Label marking a ConfigMap as managed (overrides LABEL)
    #[arg(long)]
    pub label: Option<String>,

    /// Label enabling id generation from titles (overrides GENERATE_ID_LABEL)
    #[arg(long)]
    pub generate_id_label: Option<String>,

    /// Kibana base URL (overrides KIBANA_BASE_URL)
    #[arg(long)]
    pub kibana_base_url: Option<String>,

    /// Elasticsearch base URL (overrides ELASTICSEARCH_BASE_URL)
    #[arg(long)]
    pub elasticsearch_base_url: Option<String>,

    /// Namespace to watch, or ALL (overrides NAMESPACE)
    #[arg(long)]
    pub namespace: Option<String>,

    /// JSON file with actions added to every watch (overrides DEFAULT_WATCHER_ACTIONS_FILEPATH)
    #[arg(long)]
    pub default_actions: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum transport retries per request
    #[arg(long)]
    pub max_retries: Option<usize>,

    /// Minimum seconds between watch re-subscriptions
    #[arg(long)]
    pub watch_retry_interval: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub skip_verify: bool,

    /// Log level directive (overrides LOGLEVEL)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format: json or text
    #[arg(long, value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Address for the Prometheus exporter (e.g. 0.0.0.0:9090)
    #[arg(long)]
    pub metrics_bind: Option<String>,

    /// OTLP endpoint for trace export (e.g. http://localhost:4317)
    #[arg(long)]
    pub otlp_endpoint: Option<String>,
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse()
}
