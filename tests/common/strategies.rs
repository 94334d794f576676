use ldn_notify_core::models::RawMessage;
use ldn_notify_core::QueueStatus;
use proptest::prelude::*;
use proptest::strategy::Just;

/// Strategy for raw queue status strings, known and unknown
pub fn queue_status_label_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        prop::sample::select(QueueStatus::ALL.to_vec()).prop_map(|s| Some(s.as_str().to_string())),
        "QUEUE_STATUS_[A-Z_]{1,12}".prop_map(Some),
        "[a-z .-]{0,16}".prop_map(Some),
    ]
}

/// Strategy for COAR Notify types with and without their namespace
pub fn coar_notify_type_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[A-Z][a-zA-Z]{2,20}".prop_map(|t| Some(format!("coar-notify:{t}"))),
        "[A-Z][a-zA-Z]{2,20}".prop_map(Some),
    ]
}

/// Strategy for raw messages covering every coded field the labels derive from
pub fn raw_message_strategy() -> impl Strategy<Value = RawMessage> {
    (
        "urn:uuid:[a-f0-9]{8}",
        prop::option::of(-2i32..12),
        queue_status_label_strategy(),
        coar_notify_type_strategy(),
        prop::option::of("[A-Z][a-z]{2,10}"),
        prop::option::of(1i64..5),
    )
        .prop_map(
            |(id, queue_status, queue_status_label, coar_notify_type, activity_stream_type, origin)| {
                RawMessage {
                    id: Some(id),
                    queue_status,
                    queue_status_label,
                    coar_notify_type,
                    activity_stream_type,
                    origin,
                    ..RawMessage::default()
                }
            },
        )
}

/// Strategy for per-message lookup latencies in milliseconds
pub fn latencies_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..15, 0..8)
}
