//! # Collaborator Traits
//!
//! Narrow interfaces to the components the core depends on but does not
//! implement: the REST request executor, the two reference directories and
//! the dashboard's notification sink.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::NotifyResult;
use crate::models::{ItemSummary, LdnService, RequestDescriptor, RequestEntry};

/// Executes REST requests against the notification API
///
/// Retries, backoff and timeouts belong to implementations of this trait;
/// the core issues each request once.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Generate the identifier a request is later looked up by
    fn generate_request_id(&self) -> Uuid;

    /// Resolve the href of the LDN messages endpoint
    ///
    /// # Arguments
    ///
    /// * `link` - HAL link name of the endpoint (normally `messages`)
    async fn endpoint(&self, link: &str) -> NotifyResult<String>;

    /// Submit a request
    async fn send(&self, request: RequestDescriptor) -> NotifyResult<()>;

    /// Fetch the completed entry for a previously sent request
    ///
    /// # Returns
    ///
    /// * `Ok(entry)` - The request completed; `entry.state` tells whether it succeeded
    /// * `Err` - The executor could not produce an entry at all
    async fn get_by_uuid(&self, request_id: Uuid) -> NotifyResult<RequestEntry>;
}

/// Looks up LDN services by identifier
#[async_trait]
pub trait ServiceDirectory: Send + Sync {
    async fn find_by_id(&self, id: i64) -> NotifyResult<LdnService>;
}

/// Looks up repository items by identifier
#[async_trait]
pub trait ItemDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> NotifyResult<ItemSummary>;
}

/// Receives non-fatal notices for the dashboard
pub trait NotificationSink: Send + Sync {
    fn warning(&self, title: &str, content: &str);
}

/// Sink that only records notices in the structured log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn warning(&self, title: &str, content: &str) {
        tracing::warn!(title = %title, content = %content, "⚠️ NOTIFICATION");
    }
}
