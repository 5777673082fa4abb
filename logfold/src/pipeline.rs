//! The JSON-lines pipeline wiring one aggregator to a stream.
//!
//! Reads records from stdin, one JSON object per line, stamps each with
//! wall-clock seconds, and writes emitted and passed-through records to
//! stdout. Suppressed records write nothing. Diagnostics go to stderr via
//! `tracing` so they never interleave with the output stream.

use aggregator::{Aggregator, Decision};
use serde_json::Value as JsonValue;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize combined record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Runs the aggregator over stdin until EOF. Groups still buffered at
/// EOF are dropped; incomplete groups are never persisted.
pub async fn run(mut aggregator: Aggregator) -> Result<(), PipelineError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(output) = handle_line(&mut aggregator, &line, unix_seconds())? {
            stdout.write_all(output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
    }

    stdout.flush().await?;
    debug!(
        dropped_groups = aggregator.live_groups(),
        "input stream ended"
    );
    Ok(())
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Feeds one input line through the aggregator and returns the line to
/// write downstream, if any.
///
/// Lines that do not parse as JSON objects cannot be aggregated and are
/// forwarded as-is; pass-through records keep their original line text
/// verbatim.
fn handle_line(
    aggregator: &mut Aggregator,
    line: &str,
    timestamp: u64,
) -> Result<Option<String>, PipelineError> {
    let record = match serde_json::from_str::<JsonValue>(line) {
        Ok(JsonValue::Object(map)) => map,
        Ok(_) | Err(_) => {
            warn!("input line is not a JSON object, forwarding unaggregated");
            return Ok(Some(line.to_owned()));
        }
    };

    match aggregator.process(record, timestamp) {
        Decision::Suppress => Ok(None),
        Decision::PassThrough(_) => Ok(Some(line.to_owned())),
        Decision::Emit(combined) => Ok(Some(serde_json::to_string(&combined)?)),
    }
}
