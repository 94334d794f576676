//! # In-Memory Collaborators
//!
//! Map-backed implementations of the collaborator traits. They back local
//! demos and tests, and let embedders run the core without a REST API.
//! Each can inject per-key latency so completion order can be varied.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use super::traits::{ItemDirectory, NotificationSink, RequestExecutor, ServiceDirectory};
use crate::constants::{endpoints, references};
use crate::error::{NotifyError, NotifyResult};
use crate::models::{
    decode_path_segment, ItemSummary, LdnService, RawMessage, RequestDescriptor, RequestEntry,
};

async fn delay(latency: Option<Duration>) {
    if let Some(latency) = latency {
        tokio::time::sleep(latency).await;
    }
}

/// LDN service directory backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryServiceDirectory {
    services: DashMap<i64, LdnService>,
    latencies: DashMap<i64, Duration>,
    lookups: AtomicUsize,
}

impl InMemoryServiceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(self, service: LdnService) -> Self {
        self.services.insert(service.id, service);
        self
    }

    pub fn with_latency(self, id: i64, latency: Duration) -> Self {
        self.latencies.insert(id, latency);
        self
    }

    pub fn remove(&self, id: i64) -> Option<LdnService> {
        self.services.remove(&id).map(|(_, service)| service)
    }

    /// Number of lookups issued so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceDirectory for InMemoryServiceDirectory {
    async fn find_by_id(&self, id: i64) -> NotifyResult<LdnService> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let latency = self.latencies.get(&id).map(|entry| *entry);
        delay(latency).await;

        self.services
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                NotifyError::lookup_failed(
                    references::LDN_SERVICE_DIRECTORY,
                    id.to_string(),
                    "No LDN service with this identifier",
                )
            })
    }
}

/// Repository item directory backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryItemDirectory {
    items: DashMap<Uuid, ItemSummary>,
    latencies: DashMap<Uuid, Duration>,
    lookups: AtomicUsize,
}

impl InMemoryItemDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(self, item: ItemSummary) -> Self {
        self.items.insert(item.id, item);
        self
    }

    pub fn with_latency(self, id: Uuid, latency: Duration) -> Self {
        self.latencies.insert(id, latency);
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemDirectory for InMemoryItemDirectory {
    async fn find_by_id(&self, id: Uuid) -> NotifyResult<ItemSummary> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let latency = self.latencies.get(&id).map(|entry| *entry);
        delay(latency).await;

        self.items
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                NotifyError::lookup_failed(
                    references::ITEM_DIRECTORY,
                    id.to_string(),
                    "No item with this identifier",
                )
            })
    }
}

/// Server-side outcome scripted for a reprocessing request
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedOutcome {
    /// Success without an updated record
    Unchanged,
    /// Success carrying the updated record
    Updated(RawMessage),
    /// The server rejected the action
    Rejected { status_code: u16, message: String },
}

/// Request executor that answers reprocessing requests from a script
///
/// Messages without a scripted outcome are treated as [`ScriptedOutcome::Unchanged`].
#[derive(Debug)]
pub struct InMemoryRequestExecutor {
    base_url: String,
    outcomes: DashMap<String, ScriptedOutcome>,
    entries: DashMap<Uuid, RequestEntry>,
    sent: Mutex<Vec<RequestDescriptor>>,
    latency: Option<Duration>,
}

impl InMemoryRequestExecutor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            outcomes: DashMap::new(),
            entries: DashMap::new(),
            sent: Mutex::new(Vec::new()),
            latency: None,
        }
    }

    pub fn with_outcome(self, message_id: impl Into<String>, outcome: ScriptedOutcome) -> Self {
        self.outcomes.insert(message_id.into(), outcome);
        self
    }

    /// Delay applied to every `send`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_outcome(&self, message_id: impl Into<String>, outcome: ScriptedOutcome) {
        self.outcomes.insert(message_id.into(), outcome);
    }

    pub fn sent_requests(&self) -> Vec<RequestDescriptor> {
        self.sent.lock().clone()
    }

    fn messages_href(&self) -> String {
        format!("{}/{}", self.base_url, endpoints::MESSAGES_LINK)
    }

    fn message_id_from_href(&self, href: &str) -> Option<String> {
        let prefix = self.messages_href();
        let segment = href
            .strip_prefix(prefix.as_str())?
            .strip_prefix('/')?
            .split('/')
            .next()
            .filter(|id| !id.is_empty())?;
        decode_path_segment(segment)
    }
}

#[async_trait]
impl RequestExecutor for InMemoryRequestExecutor {
    fn generate_request_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    async fn endpoint(&self, link: &str) -> NotifyResult<String> {
        Ok(format!("{}/{}", self.base_url, link))
    }

    async fn send(&self, request: RequestDescriptor) -> NotifyResult<()> {
        delay(self.latency).await;
        self.sent.lock().push(request.clone());

        let message_id = self.message_id_from_href(&request.href).ok_or_else(|| {
            NotifyError::request_executor("send", format!("Unroutable href: {}", request.href))
        })?;
        let outcome = self
            .outcomes
            .get(&message_id)
            .map(|entry| entry.value().clone())
            .unwrap_or(ScriptedOutcome::Unchanged);

        let entry = match outcome {
            ScriptedOutcome::Unchanged => RequestEntry::success(request.request_id, None),
            ScriptedOutcome::Updated(record) => {
                RequestEntry::success(request.request_id, Some(record))
            }
            ScriptedOutcome::Rejected {
                status_code,
                message,
            } => RequestEntry::error(request.request_id, status_code, message),
        };
        self.entries.insert(request.request_id, entry);
        Ok(())
    }

    async fn get_by_uuid(&self, request_id: Uuid) -> NotifyResult<RequestEntry> {
        self.entries
            .get(&request_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                NotifyError::request_executor("get_by_uuid", format!("Unknown request {request_id}"))
            })
    }
}

/// Notice captured by [`RecordingNotificationSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub content: String,
}

/// Notification sink that keeps every warning it receives
#[derive(Debug, Default)]
pub struct RecordingNotificationSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn warning(&self, title: &str, content: &str) {
        self.notices.lock().push(Notice {
            title: title.to_string(),
            content: content.to_string(),
        });
    }
}
