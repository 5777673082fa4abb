mod config;
mod pipeline;

use aggregator::Aggregator;
use aggregator::metrics_defs::ALL_METRICS;
use clap::Parser;
use config::Config;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Folds per-request log lines into one combined record per request,
/// grouped by trace id. Reads JSON lines on stdin, writes them on stdout.
#[derive(Parser)]
struct Cli {
    /// Path to the YAML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
enum MainError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Metrics(#[from] shared::metrics::MetricsError),
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

fn main() -> Result<(), MainError> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries the record stream.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let _sentry = config.logging.as_ref().map(|logging| {
        sentry::init((
            logging.sentry_dsn.clone(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    if let Some(metrics) = &config.metrics {
        shared::metrics::install_statsd(&metrics.statsd_host, metrics.statsd_port, &metrics.prefix)?;
        shared::metrics::describe_all(ALL_METRICS);
    }

    let aggregator = Aggregator::new(config.aggregator.clone());
    info!(
        max_groups = config.aggregator.max_groups,
        sweep_interval = config.aggregator.sweep_interval,
        stale_after_secs = config.aggregator.stale_after_secs,
        "starting aggregation pipeline"
    );

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(pipeline::run(aggregator))?;

    Ok(())
}
