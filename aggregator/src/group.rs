//! Per-key accumulation state.

use crate::record::Record;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// The accumulating state for one correlation key's unflushed records.
#[derive(Debug)]
pub(crate) struct Group {
    /// Timestamp of the last record applied to this group, updated on
    /// every record including suppressed duplicates.
    pub last_seen: u64,
    /// Set when the group has flushed; cleared again when a new request
    /// reuses the slot. While set, repeat completion signals are dropped.
    pub completed: bool,
    messages: Vec<String>,
    latest_fields: HashMap<String, JsonValue>,
}

impl Group {
    pub fn new(now: u64) -> Self {
        Group {
            last_seen: now,
            completed: false,
            messages: Vec::new(),
            latest_fields: HashMap::new(),
        }
    }

    /// Applies one record: appends its message and overwrites each status
    /// field the record carries a non-null value for. Fields the record
    /// omits keep their stored value.
    pub fn apply(&mut self, record: &Record, message: &str, status_fields: &[String]) {
        self.messages.push(message.to_owned());
        for field in status_fields {
            if let Some(value) = record.get(field)
                && !value.is_null()
            {
                self.latest_fields.insert(field.clone(), value.clone());
            }
        }
    }

    /// Builds the combined record and resets the group to an empty,
    /// completed shell. The shell stays resident so that a repeated
    /// completion signal can be recognized and suppressed.
    pub fn flush(
        &mut self,
        key_field: &str,
        key: &str,
        message_field: &str,
        status_fields: &[String],
    ) -> Record {
        let mut combined = Record::new();
        combined.insert(key_field.to_owned(), JsonValue::String(key.to_owned()));
        combined.insert(
            message_field.to_owned(),
            JsonValue::String(self.messages.join("\n")),
        );
        for field in status_fields {
            if let Some(value) = self.latest_fields.remove(field) {
                combined.insert(field.clone(), value);
            }
        }

        self.messages.clear();
        self.latest_fields.clear();
        self.completed = true;
        combined
    }

    /// Reuses a flushed shell for a fresh request on the same key.
    pub fn revive(&mut self) {
        self.completed = false;
    }
}
