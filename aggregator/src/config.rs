use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("max_groups cannot be 0")]
    ZeroCapacity,

    #[error("sweep_interval cannot be 0")]
    ZeroSweepInterval,

    #[error("Empty field name for {0}")]
    EmptyFieldName(&'static str),

    #[error("Empty completion marker")]
    EmptyCompletionMarker,

    #[error("Duplicate status field: {0}")]
    DuplicateStatusField(String),

    #[error("Status field conflicts with the key or message field: {0}")]
    ReservedStatusField(String),
}

/// Aggregation tunables.
///
/// All fields default to the values the upstream producer's log schema
/// expects, so an empty config section yields a working aggregator.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Field carrying the correlation key that groups records into one
    /// logical request.
    pub key_field: String,
    /// Field carrying the log message.
    pub message_field: String,
    /// Substring of a message that marks a request's final record.
    pub completion_marker: String,
    /// Fields tracked last-write-wins and attached to the combined record.
    pub status_fields: Vec<String>,
    /// Maximum number of simultaneously buffered groups.
    pub max_groups: usize,
    /// Number of processed records between staleness sweeps.
    pub sweep_interval: u64,
    /// Seconds a group may go untouched before a sweep drops it.
    pub stale_after_secs: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorConfig {
            key_field: "traceId".to_owned(),
            message_field: "message".to_owned(),
            completion_marker: "request completed".to_owned(),
            status_fields: ["method", "path", "status", "latencyMs"]
                .map(str::to_owned)
                .to_vec(),
            max_groups: 1000,
            sweep_interval: 100,
            stale_after_secs: 30,
        }
    }
}

impl AggregatorConfig {
    /// Validates the aggregator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_groups == 0 {
            return Err(ValidationError::ZeroCapacity);
        }
        if self.sweep_interval == 0 {
            return Err(ValidationError::ZeroSweepInterval);
        }
        if self.key_field.is_empty() {
            return Err(ValidationError::EmptyFieldName("key_field"));
        }
        if self.message_field.is_empty() {
            return Err(ValidationError::EmptyFieldName("message_field"));
        }
        if self.completion_marker.is_empty() {
            return Err(ValidationError::EmptyCompletionMarker);
        }

        let mut seen = HashSet::new();
        for field in &self.status_fields {
            if field == &self.key_field || field == &self.message_field {
                return Err(ValidationError::ReservedStatusField(field.clone()));
            }
            if !seen.insert(field) {
                return Err(ValidationError::DuplicateStatusField(field.clone()));
            }
        }

        Ok(())
    }
}
