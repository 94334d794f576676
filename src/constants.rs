//! # System Constants
//!
//! Queue status codes, label tables, and fallback values shared by the
//! label formatter and the reference resolver.
//!
//! Queue status codes mirror the numeric codes the LDN message queue reports,
//! so dashboards backed by the same REST API render identical labels.

use serde::{Deserialize, Serialize};

/// Queue status reported by the LDN message queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    Queued,
    Processing,
    Processed,
    Failed,
    Untrusted,
    UnmappedAction,
    QueuedForRetry,
    UntrustedIp,
}

impl QueueStatus {
    pub const ALL: [QueueStatus; 8] = [
        QueueStatus::Queued,
        QueueStatus::Processing,
        QueueStatus::Processed,
        QueueStatus::Failed,
        QueueStatus::Untrusted,
        QueueStatus::UnmappedAction,
        QueueStatus::QueuedForRetry,
        QueueStatus::UntrustedIp,
    ];

    /// Numeric code as stored by the queue
    pub fn code(&self) -> i32 {
        match self {
            QueueStatus::Queued => 1,
            QueueStatus::Processing => 2,
            QueueStatus::Processed => 3,
            QueueStatus::Failed => 4,
            QueueStatus::Untrusted => 5,
            QueueStatus::UnmappedAction => 6,
            QueueStatus::QueuedForRetry => 7,
            QueueStatus::UntrustedIp => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    /// Raw status string as sent over the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Queued => "QUEUE_STATUS_QUEUED",
            QueueStatus::Processing => "QUEUE_STATUS_PROCESSING",
            QueueStatus::Processed => "QUEUE_STATUS_PROCESSED",
            QueueStatus::Failed => "QUEUE_STATUS_FAILED",
            QueueStatus::Untrusted => "QUEUE_STATUS_UNTRUSTED",
            QueueStatus::UnmappedAction => "QUEUE_STATUS_UNMAPPED_ACTION",
            QueueStatus::QueuedForRetry => "QUEUE_STATUS_QUEUED_FOR_RETRY",
            QueueStatus::UntrustedIp => "QUEUE_STATUS_UNTRUSTED_IP",
        }
    }

    pub fn from_raw(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }

    /// Human-readable label key rendered by the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            QueueStatus::Queued => "notify-queue-status.queued",
            QueueStatus::Processing => "notify-queue-status.processing",
            QueueStatus::Processed => "notify-queue-status.processed",
            QueueStatus::Failed => "notify-queue-status.failed",
            QueueStatus::Untrusted => "notify-queue-status.untrusted",
            QueueStatus::UnmappedAction => "notify-queue-status.unmapped_action",
            QueueStatus::QueuedForRetry => "notify-queue-status.queued_for_retry",
            QueueStatus::UntrustedIp => "notify-queue-status.untrusted_ip",
        }
    }

    /// Statuses an operator may push back onto the queue
    pub fn is_reprocessable(&self) -> bool {
        matches!(
            self,
            QueueStatus::Failed | QueueStatus::Untrusted | QueueStatus::UnmappedAction
        )
    }
}

/// Label formatting constants
pub mod labels {
    /// Label for absent or empty status codes
    pub const UNKNOWN_STATUS_LABEL: &str = "notify-queue-status.unknown";

    /// Namespace prefix carried by COAR Notify type codes
    pub const COAR_NOTIFY_PREFIX: &str = "coar-notify:";

    /// Type label when a message carries no type information
    pub const EMPTY_TYPE_LABEL: &str = "";
}

/// Reference resolution constants
pub mod references {
    /// Display name used when a reference is absent or cannot be resolved
    pub const FALLBACK_NAME: &str = "";

    /// Directory name for LDN service lookups
    pub const LDN_SERVICE_DIRECTORY: &str = "ldn_services";

    /// Directory name for repository item lookups
    pub const ITEM_DIRECTORY: &str = "items";
}

/// REST endpoint constants
pub mod endpoints {
    /// HAL link name of the LDN messages endpoint
    pub const MESSAGES_LINK: &str = "messages";

    /// Action appended to a message href to enqueue a retry
    pub const REPROCESS_ACTION: &str = "enqueueretry";
}
