//! # Admin Notify Messages Service
//!
//! Single entry point the admin dashboard holds: label formatting, detail
//! hydration for the initial load, and reprocessing of one message against
//! the dashboard's shared collection.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ldn_notify_core::collaborators::{
//!     InMemoryItemDirectory, InMemoryRequestExecutor, InMemoryServiceDirectory,
//!     TracingNotificationSink,
//! };
//! use ldn_notify_core::models::RawMessage;
//! use ldn_notify_core::services::AdminNotifyMessagesService;
//!
//! # async fn example(raw: Vec<RawMessage>) -> Result<(), Box<dyn std::error::Error>> {
//! let service = AdminNotifyMessagesService::builder()
//!     .request_executor(Arc::new(InMemoryRequestExecutor::new("https://rest.api/server/api/ldn")))
//!     .service_directory(Arc::new(InMemoryServiceDirectory::new()))
//!     .item_directory(Arc::new(InMemoryItemDirectory::new()))
//!     .notifications(Arc::new(TracingNotificationSink))
//!     .build()?;
//!
//! let messages = service.find_messages(raw).await?;
//! let first = messages.snapshot().iter().next().cloned();
//! if let Some(first) = first {
//!     let updated = service.reprocess_message(&first, &messages).await?;
//!     println!("{} messages after reprocessing", updated.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::collaborators::{
    ItemDirectory, NotificationSink, RequestExecutor, ServiceDirectory, TracingNotificationSink,
};
use crate::config::NotifyConfig;
use crate::error::{NotifyError, NotifyResult};
use crate::models::{EnrichedMessage, MessageCollection, RawMessage, SharedMessageCollection};
use crate::services::detail_hydrator::DetailHydrator;
use crate::services::label_formatter;
use crate::services::reference_resolver::ReferenceResolver;
use crate::services::reprocessor::Reprocessor;

#[derive(Debug)]
pub struct AdminNotifyMessagesService {
    hydrator: Arc<DetailHydrator>,
    reprocessor: Reprocessor,
}

impl AdminNotifyMessagesService {
    pub fn new(
        config: &NotifyConfig,
        executor: Arc<dyn RequestExecutor>,
        services: Arc<dyn ServiceDirectory>,
        items: Arc<dyn ItemDirectory>,
        notifications: Arc<dyn NotificationSink>,
    ) -> NotifyResult<Self> {
        config.validate()?;

        let resolver =
            ReferenceResolver::new(services, items, notifications).with_config(&config.hydration);
        let hydrator = Arc::new(
            DetailHydrator::new(resolver).with_concurrency_limit(config.hydration_limit()),
        );
        let reprocessor = Reprocessor::new(executor, hydrator.clone())
            .with_config(&config.endpoints, &config.reprocess);

        Ok(Self {
            hydrator,
            reprocessor,
        })
    }

    pub fn builder() -> AdminNotifyMessagesServiceBuilder {
        AdminNotifyMessagesServiceBuilder::default()
    }

    pub fn format_message_labels(&self, message: impl Into<EnrichedMessage>) -> EnrichedMessage {
        label_formatter::format_message_labels(message)
    }

    pub async fn get_detailed_messages<I>(&self, messages: I) -> Vec<EnrichedMessage>
    where
        I: IntoIterator<Item = RawMessage>,
    {
        self.hydrator.get_detailed_messages(messages).await
    }

    /// Hydrate `messages` and wrap them in a fresh shared collection
    pub async fn find_messages<I>(&self, messages: I) -> NotifyResult<SharedMessageCollection>
    where
        I: IntoIterator<Item = RawMessage>,
    {
        let detailed = self.get_detailed_messages(messages).await;
        Ok(SharedMessageCollection::new(MessageCollection::new(detailed)?))
    }

    pub async fn reprocess_message(
        &self,
        message: &EnrichedMessage,
        messages: &SharedMessageCollection,
    ) -> NotifyResult<MessageCollection> {
        self.reprocessor.reprocess_message(message, messages).await
    }

    pub fn is_reprocessing(&self, message_id: &str) -> bool {
        self.reprocessor.is_in_flight(message_id)
    }
}

/// Builder for [`AdminNotifyMessagesService`]
///
/// The notification sink defaults to [`TracingNotificationSink`] and the
/// configuration to [`NotifyConfig::default`]; the other collaborators are required.
#[derive(Default)]
pub struct AdminNotifyMessagesServiceBuilder {
    config: Option<NotifyConfig>,
    executor: Option<Arc<dyn RequestExecutor>>,
    services: Option<Arc<dyn ServiceDirectory>>,
    items: Option<Arc<dyn ItemDirectory>>,
    notifications: Option<Arc<dyn NotificationSink>>,
}

impl AdminNotifyMessagesServiceBuilder {
    pub fn config(mut self, config: NotifyConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn request_executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn service_directory(mut self, services: Arc<dyn ServiceDirectory>) -> Self {
        self.services = Some(services);
        self
    }

    pub fn item_directory(mut self, items: Arc<dyn ItemDirectory>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn notifications(mut self, notifications: Arc<dyn NotificationSink>) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn build(self) -> NotifyResult<AdminNotifyMessagesService> {
        let missing = |name: &str| NotifyError::configuration("service_builder", format!("{name} is required"));

        AdminNotifyMessagesService::new(
            &self.config.unwrap_or_default(),
            self.executor.ok_or_else(|| missing("request_executor"))?,
            self.services.ok_or_else(|| missing("service_directory"))?,
            self.items.ok_or_else(|| missing("item_directory"))?,
            self.notifications
                .unwrap_or_else(|| Arc::new(TracingNotificationSink)),
        )
    }
}
