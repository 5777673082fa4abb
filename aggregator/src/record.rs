//! Input record representation and field accessors.

use serde_json::Value as JsonValue;

/// A log record as received from the producer: an arbitrary mapping from
/// field name to JSON value.
pub type Record = serde_json::Map<String, JsonValue>;

/// Extracts the correlation key from a record.
///
/// Returns `None` when the field is absent, not a string, or empty; such
/// records bypass aggregation entirely.
pub fn correlation_key<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    match record.get(field) {
        Some(JsonValue::String(key)) if !key.is_empty() => Some(key),
        _ => None,
    }
}

/// The record's message text. Absent or non-string values read as empty.
pub fn message_text<'a>(record: &'a Record, field: &str) -> &'a str {
    match record.get(field) {
        Some(JsonValue::String(message)) => message,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("expected a JSON object, got {other}"),
        }
    }

    #[test]
    fn test_correlation_key() {
        let valid = record(json!({"traceId": "abc-123"}));
        assert_eq!(correlation_key(&valid, "traceId"), Some("abc-123"));

        let absent = record(json!({"message": "hello"}));
        assert_eq!(correlation_key(&absent, "traceId"), None);

        let empty = record(json!({"traceId": ""}));
        assert_eq!(correlation_key(&empty, "traceId"), None);

        let numeric = record(json!({"traceId": 42}));
        assert_eq!(correlation_key(&numeric, "traceId"), None);

        let null = record(json!({"traceId": null}));
        assert_eq!(correlation_key(&null, "traceId"), None);
    }

    #[test]
    fn test_message_text() {
        let present = record(json!({"message": "request completed"}));
        assert_eq!(message_text(&present, "message"), "request completed");

        let absent = record(json!({"status": 200}));
        assert_eq!(message_text(&absent, "message"), "");

        let non_string = record(json!({"message": 7}));
        assert_eq!(message_text(&non_string, "message"), "");
    }
}
