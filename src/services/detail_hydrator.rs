//! # Detail Hydrator
//!
//! Turns raw messages into display-ready messages: labels are formatted
//! synchronously, then every message's references are resolved concurrently.
//! The per-message futures are joined so the output keeps the input order no
//! matter which lookups finish first.

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::models::{EnrichedMessage, RawMessage};
use crate::services::label_formatter::format_message_labels;
use crate::services::reference_resolver::ReferenceResolver;

#[derive(Debug)]
pub struct DetailHydrator {
    resolver: ReferenceResolver,
    concurrency_limit: Option<usize>,
}

impl DetailHydrator {
    pub fn new(resolver: ReferenceResolver) -> Self {
        Self {
            resolver,
            concurrency_limit: None,
        }
    }

    /// Cap the number of messages resolved at once; `None` or `Some(0)` means unbounded
    pub fn with_concurrency_limit(mut self, limit: Option<usize>) -> Self {
        self.concurrency_limit = limit.filter(|n| *n > 0);
        self
    }

    /// Enrich every message; output has the same length and order as the input
    pub async fn get_detailed_messages<I>(&self, messages: I) -> Vec<EnrichedMessage>
    where
        I: IntoIterator<Item = RawMessage>,
    {
        let messages: Vec<RawMessage> = messages.into_iter().collect();
        if messages.is_empty() {
            debug!("No messages to hydrate");
            return Vec::new();
        }

        let total = messages.len();
        let pending = messages.into_iter().map(|message| self.hydrate_one(message));
        let detailed: Vec<EnrichedMessage> = match self.concurrency_limit {
            None => join_all(pending).await,
            // buffered (not buffer_unordered) yields in submission order
            Some(limit) => stream::iter(pending).buffered(limit).collect().await,
        };

        info!(
            message_count = total,
            concurrency_limit = ?self.concurrency_limit,
            "Hydrated message details"
        );
        detailed
    }

    /// Format and resolve a single message
    pub async fn hydrate_one(&self, message: impl Into<EnrichedMessage>) -> EnrichedMessage {
        let labeled = format_message_labels(message);
        let resolved = self
            .resolver
            .resolve(labeled.raw.service_reference(), labeled.raw.item_reference())
            .await;
        labeled.with_names(resolved.service_name, resolved.item_name)
    }

    /// Hydrate an updated record of `current`
    ///
    /// A reference the update left unchanged keeps `current`'s resolved name
    /// when its lookup fails now, so a transient directory error never blanks
    /// a name that was already known.
    pub async fn rehydrate(&self, updated: RawMessage, current: &EnrichedMessage) -> EnrichedMessage {
        let labeled = format_message_labels(updated);
        let service_ref = labeled.raw.service_reference();
        let item_ref = labeled.raw.item_reference();
        let resolved = self.resolver.resolve(service_ref, item_ref).await;

        let service_name = if resolved.service_degraded && service_ref == current.raw.service_reference() {
            current.ldn_service.clone()
        } else {
            resolved.service_name
        };
        let item_name = if resolved.item_degraded && item_ref == current.raw.item_reference() {
            current.related_item.clone()
        } else {
            resolved.item_name
        };
        labeled.with_names(service_name, item_name)
    }
}
