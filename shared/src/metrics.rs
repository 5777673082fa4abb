//! StatsD exporter wiring for the `metrics` facade.

use crate::metrics_defs::{MetricDef, MetricType};
use metrics_exporter_statsd::{StatsdBuilder, StatsdError};
use thiserror::Error;
use tracing::debug;

const QUEUE_SIZE: usize = 5000;
const BUFFER_SIZE: usize = 1024;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("could not build statsd exporter: {0}")]
    Statsd(#[from] StatsdError),

    #[error("a global metrics recorder is already installed")]
    RecorderAlreadySet,
}

/// Installs a global StatsD recorder. Call at most once, at startup.
pub fn install_statsd(host: &str, port: u16, prefix: &str) -> Result<(), MetricsError> {
    let recorder = StatsdBuilder::from(host, port)
        .with_queue_size(QUEUE_SIZE)
        .with_buffer_size(BUFFER_SIZE)
        .build(Some(prefix))?;

    metrics::set_global_recorder(recorder).map_err(|_| MetricsError::RecorderAlreadySet)?;
    Ok(())
}

/// Registers descriptions for a crate's metric definitions with the
/// installed recorder.
pub fn describe_all(defs: &[MetricDef]) {
    for def in defs {
        match def.metric_type {
            MetricType::Counter => metrics::describe_counter!(def.name, def.description),
            MetricType::Gauge => metrics::describe_gauge!(def.name, def.description),
            MetricType::Histogram => metrics::describe_histogram!(def.name, def.description),
        }
        debug!(
            name = def.name,
            r#type = def.metric_type.as_str(),
            "registered metric"
        );
    }
}
