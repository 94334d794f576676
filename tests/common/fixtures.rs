use std::sync::Arc;
use std::time::Duration;

use ldn_notify_core::collaborators::{
    InMemoryItemDirectory, InMemoryRequestExecutor, InMemoryServiceDirectory,
    RecordingNotificationSink,
};
use ldn_notify_core::models::{ItemSummary, LdnService, RawMessage};
use ldn_notify_core::{AdminNotifyMessagesService, EnrichedMessage, NotifyConfig};
use serde_json::json;
use uuid::Uuid;

pub const ENDPOINT_URL: &str = "https://rest.api/server/api/ldn";
pub const TEST_LDN_SERVICE_NAME: &str = "testLdnService";
pub const TEST_RELATED_ITEM_NAME: &str = "testRelatedItem";

pub const FIRST_SERVICE_ID: i64 = 1;
pub const SECOND_SERVICE_ID: i64 = 2;

pub fn first_item_id() -> Uuid {
    Uuid::parse_str("24d50450-9ff0-485f-82d4-fba1be42f3f9").unwrap()
}

pub fn second_item_id() -> Uuid {
    Uuid::parse_str("b2a5c8a0-3f0e-4bd4-a6e1-2e9b2a4b6f10").unwrap()
}

/// Two messages as the messages endpoint returns them
pub fn mock_unformatted_admin_notify_messages() -> Vec<RawMessage> {
    let messages = json!([
        {
            "type": "message",
            "id": "urn:uuid:5fe8d3e0-8f1c-4a4e-9ae8-4e1b2a7c1234",
            "notificationId": "urn:uuid:5fe8d3e0-8f1c-4a4e-9ae8-4e1b2a7c1234",
            "notificationType": "Announce",
            "coarNotifyType": "coar-notify:ReviewAction",
            "activityStreamType": "Announce",
            "origin": FIRST_SERVICE_ID,
            "context": first_item_id(),
            "queueStatus": 3,
            "queueStatusLabel": "QUEUE_STATUS_PROCESSED",
            "queueAttempts": 1,
            "queueLastStartTime": "2023-11-24T14:44:00.064+00:00",
            "queueTimeout": "2023-11-24T15:44:00.064+00:00"
        },
        {
            "type": "message",
            "id": "urn:uuid:544c8777-e826-4810-a625-3e394cc3660d",
            "notificationId": "urn:uuid:544c8777-e826-4810-a625-3e394cc3660d",
            "notificationType": "Offer",
            "coarNotifyType": "coar-notify:EndorsementAction",
            "activityStreamType": "Offer",
            "target": SECOND_SERVICE_ID,
            "object": second_item_id(),
            "queueStatus": 4,
            "queueStatusLabel": "QUEUE_STATUS_FAILED",
            "queueAttempts": 5,
            "queueLastStartTime": "2023-11-24T14:44:00.064+00:00",
            "queueTimeout": "2023-11-24T15:44:00.064+00:00"
        }
    ]);
    serde_json::from_value(messages).unwrap()
}

/// The same two messages after label formatting
pub fn mock_admin_notify_messages() -> Vec<EnrichedMessage> {
    let labels = [
        ("notify-queue-status.processed", "ReviewAction"),
        ("notify-queue-status.failed", "EndorsementAction"),
    ];
    mock_unformatted_admin_notify_messages()
        .into_iter()
        .zip(labels)
        .map(|(raw, (label, type_label))| EnrichedMessage {
            raw,
            label: label.to_string(),
            type_label: type_label.to_string(),
            ..Default::default()
        })
        .collect()
}

pub fn service_directory() -> InMemoryServiceDirectory {
    InMemoryServiceDirectory::new()
        .with_service(LdnService::new(FIRST_SERVICE_ID, TEST_LDN_SERVICE_NAME))
        .with_service(LdnService::new(SECOND_SERVICE_ID, "secondLdnService"))
}

pub fn item_directory() -> InMemoryItemDirectory {
    InMemoryItemDirectory::new()
        .with_item(ItemSummary::new(first_item_id(), TEST_RELATED_ITEM_NAME))
        .with_item(ItemSummary::new(second_item_id(), "secondRelatedItem"))
}

/// Service under test together with handles on its collaborators
pub struct TestHarness {
    pub service: AdminNotifyMessagesService,
    pub executor: Arc<InMemoryRequestExecutor>,
    pub services: Arc<InMemoryServiceDirectory>,
    pub items: Arc<InMemoryItemDirectory>,
    pub notifications: Arc<RecordingNotificationSink>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_collaborators(
            InMemoryRequestExecutor::new(ENDPOINT_URL),
            service_directory(),
            item_directory(),
            NotifyConfig::default(),
        )
    }

    pub fn with_collaborators(
        executor: InMemoryRequestExecutor,
        services: InMemoryServiceDirectory,
        items: InMemoryItemDirectory,
        config: NotifyConfig,
    ) -> Self {
        let executor = Arc::new(executor);
        let services = Arc::new(services);
        let items = Arc::new(items);
        let notifications = Arc::new(RecordingNotificationSink::new());

        let service = AdminNotifyMessagesService::builder()
            .config(config)
            .request_executor(executor.clone())
            .service_directory(services.clone())
            .item_directory(items.clone())
            .notifications(notifications.clone())
            .build()
            .unwrap();

        Self {
            service,
            executor,
            services,
            items,
            notifications,
        }
    }
}

/// Service directory whose lookups finish in the given per-id latencies
pub fn service_directory_with_latencies(latencies_ms: &[u64]) -> InMemoryServiceDirectory {
    latencies_ms
        .iter()
        .enumerate()
        .fold(InMemoryServiceDirectory::new(), |directory, (index, ms)| {
            let id = index as i64 + 1;
            directory
                .with_service(LdnService::new(id, format!("service-{id}")))
                .with_latency(id, Duration::from_millis(*ms))
        })
}
