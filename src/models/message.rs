use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::QueueStatus;

/// RawMessage is an LDN notification record as returned by the messages endpoint
///
/// The shape follows the REST representation (camelCase keys). Every field is
/// optional so that partially populated records still deserialize; the
/// identifier is validated where an operation needs it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMessage {
    pub id: Option<String>,
    pub notification_id: Option<String>,
    pub notification_type: Option<String>,
    pub coar_notify_type: Option<String>,
    pub activity_stream_type: Option<String>,
    pub in_reply_to: Option<String>,
    /// LDN service the message came from
    pub origin: Option<i64>,
    /// LDN service the message is addressed to
    pub target: Option<i64>,
    /// Repository item the message is about
    pub object: Option<Uuid>,
    /// Repository item the message was sent in the context of
    pub context: Option<Uuid>,
    pub queue_status: Option<i32>,
    pub queue_status_label: Option<String>,
    pub queue_attempts: Option<u32>,
    pub queue_last_start_time: Option<DateTime<Utc>>,
    pub queue_timeout: Option<DateTime<Utc>>,
    pub message: Option<serde_json::Value>,
}

impl RawMessage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: i64) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_target(mut self, target: i64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_object(mut self, object: Uuid) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_context(mut self, context: Uuid) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_queue_status(mut self, status: QueueStatus) -> Self {
        self.queue_status = Some(status.code());
        self.queue_status_label = Some(status.as_str().to_string());
        self
    }

    pub fn with_coar_notify_type(mut self, coar_notify_type: impl Into<String>) -> Self {
        self.coar_notify_type = Some(coar_notify_type.into());
        self
    }

    /// Identifier, treating an empty string as absent
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// LDN service this message refers to: the target for outgoing messages, the origin otherwise
    pub fn service_reference(&self) -> Option<i64> {
        self.target.or(self.origin)
    }

    /// Repository item this message refers to: the object, falling back to the context
    pub fn item_reference(&self) -> Option<Uuid> {
        self.object.or(self.context)
    }

    pub fn status(&self) -> Option<QueueStatus> {
        self.queue_status_label
            .as_deref()
            .and_then(QueueStatus::from_raw)
            .or_else(|| self.queue_status.and_then(QueueStatus::from_code))
    }

    /// Fill reference fields the server left out with the ones from `original`
    pub fn with_references_from(mut self, original: &RawMessage) -> Self {
        self.origin = self.origin.or(original.origin);
        self.target = self.target.or(original.target);
        self.object = self.object.or(original.object);
        self.context = self.context.or(original.context);
        self
    }
}

/// EnrichedMessage is a RawMessage plus the display fields the dashboard renders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMessage {
    #[serde(flatten)]
    pub raw: RawMessage,
    /// Human-readable queue status
    pub label: String,
    /// Human-readable notification type
    pub type_label: String,
    /// Display name of the referenced LDN service
    pub ldn_service: String,
    /// Display name of the referenced repository item
    pub related_item: String,
}

impl EnrichedMessage {
    pub fn identifier(&self) -> Option<&str> {
        self.raw.identifier()
    }

    pub fn with_names(mut self, ldn_service: impl Into<String>, related_item: impl Into<String>) -> Self {
        self.ldn_service = ldn_service.into();
        self.related_item = related_item.into();
        self
    }
}

impl From<RawMessage> for EnrichedMessage {
    fn from(raw: RawMessage) -> Self {
        Self {
            raw,
            ..Default::default()
        }
    }
}
