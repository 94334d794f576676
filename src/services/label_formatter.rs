//! # Label Formatter
//!
//! Derives the display labels of a message from its coded fields. Pure and
//! total: every input, including absent or unknown codes, yields a label.

use crate::constants::{labels, QueueStatus};
use crate::models::{EnrichedMessage, RawMessage};

/// Populate the label fields of a raw or already enriched message
///
/// Labels are recomputed from the raw codes only, so formatting twice gives
/// the same result. Reference fields and resolved names are left untouched.
pub fn format_message_labels(message: impl Into<EnrichedMessage>) -> EnrichedMessage {
    let mut message = message.into();
    message.label = status_label(&message.raw);
    message.type_label = type_label(&message.raw);
    message
}

/// Queue status label: the raw status string wins over the numeric code
///
/// Unrecognised status strings pass through unchanged.
pub fn status_label(raw: &RawMessage) -> String {
    if let Some(code) = non_empty(raw.queue_status_label.as_deref()) {
        return QueueStatus::from_raw(code)
            .map(|status| status.label().to_string())
            .unwrap_or_else(|| code.to_string());
    }

    raw.queue_status
        .and_then(QueueStatus::from_code)
        .map(|status| status.label())
        .unwrap_or(labels::UNKNOWN_STATUS_LABEL)
        .to_string()
}

/// Notification type label: COAR Notify type without its namespace, else the ActivityStreams type
pub fn type_label(raw: &RawMessage) -> String {
    let coar_type = non_empty(raw.coar_notify_type.as_deref())
        .map(|t| t.strip_prefix(labels::COAR_NOTIFY_PREFIX).unwrap_or(t))
        .and_then(|t| non_empty(Some(t)));
    if let Some(coar_type) = coar_type {
        return coar_type.to_string();
    }

    non_empty(raw.activity_stream_type.as_deref())
        .unwrap_or(labels::EMPTY_TYPE_LABEL)
        .to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
