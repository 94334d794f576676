//! # Reprocessor
//!
//! Enqueues a server-side retry for one message and merges the authoritative
//! result back into the dashboard's collection.
//!
//! Each attempt moves through [`ReprocessState`]:
//!
//! ```text
//! Idle -> Submitted -> Resolved -> Merged
//!   \________\___________\______-> Failed
//! ```
//!
//! The collection is only written in the `Resolved -> Merged` step, by a single
//! replace-by-identifier, and not at all when the server reports no change. Every failure leaves it exactly as it was, so the
//! operator can resubmit.

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::collaborators::RequestExecutor;
use crate::config::{EndpointsConfig, ReprocessConfig};
use crate::error::{NotifyError, NotifyResult};
use crate::logging::log_message_operation;
use crate::models::{
    encode_path_segment, EnrichedMessage, MessageCollection, RawMessage, RequestDescriptor,
    SharedMessageCollection,
};
use crate::services::detail_hydrator::DetailHydrator;

/// Progress of a single reprocessing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReprocessState {
    Idle,
    Submitted,
    Resolved,
    Merged,
    Failed,
}

impl ReprocessState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReprocessState::Merged | ReprocessState::Failed)
    }

    pub fn can_transition_to(&self, next: ReprocessState) -> bool {
        use ReprocessState::*;
        matches!(
            (self, next),
            (Idle, Submitted) | (Submitted, Resolved) | (Resolved, Merged)
        ) || (!self.is_terminal() && next == Failed)
    }
}

impl fmt::Display for ReprocessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReprocessState::Idle => "idle",
            ReprocessState::Submitted => "submitted",
            ReprocessState::Resolved => "resolved",
            ReprocessState::Merged => "merged",
            ReprocessState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Marks a message identifier as in flight until dropped
struct InFlightGuard<'a> {
    in_flight: &'a DashMap<String, ()>,
    message_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.message_id);
    }
}

pub struct Reprocessor {
    executor: Arc<dyn RequestExecutor>,
    hydrator: Arc<DetailHydrator>,
    endpoints: EndpointsConfig,
    single_flight: bool,
    in_flight: DashMap<String, ()>,
}

impl fmt::Debug for Reprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reprocessor")
            .field("endpoints", &self.endpoints)
            .field("single_flight", &self.single_flight)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl Reprocessor {
    pub fn new(executor: Arc<dyn RequestExecutor>, hydrator: Arc<DetailHydrator>) -> Self {
        Self {
            executor,
            hydrator,
            endpoints: EndpointsConfig::default(),
            single_flight: ReprocessConfig::default().single_flight,
            in_flight: DashMap::new(),
        }
    }

    pub fn with_config(mut self, endpoints: &EndpointsConfig, reprocess: &ReprocessConfig) -> Self {
        self.endpoints = endpoints.clone();
        self.single_flight = reprocess.single_flight;
        self
    }

    /// Whether a reprocessing attempt for `message_id` is currently running
    pub fn is_in_flight(&self, message_id: &str) -> bool {
        self.in_flight.contains_key(message_id)
    }

    /// Reprocess `message` and merge the result into `messages`
    ///
    /// # Returns
    ///
    /// * `Ok(snapshot)` - The full collection after the replace, same length and order
    /// * `Err` - Nothing was written; the original entry is still in place
    pub async fn reprocess_message(
        &self,
        message: &EnrichedMessage,
        messages: &SharedMessageCollection,
    ) -> NotifyResult<MessageCollection> {
        let message_id = message
            .identifier()
            .ok_or_else(|| NotifyError::malformed_message("message to reprocess has no identifier"))?
            .to_string();
        if !messages.contains(&message_id) {
            return Err(NotifyError::message_not_found(message_id));
        }

        if let Some(status) = message.raw.status().filter(|s| !s.is_reprocessable()) {
            debug!(
                message_id = %message_id,
                status = status.as_str(),
                "Reprocessing a message that is not in a failed state"
            );
        }

        let _guard = self.acquire(&message_id)?;
        let mut state = ReprocessState::Idle;
        let result = self
            .run(&message_id, &message.raw, messages, &mut state)
            .await;

        match &result {
            Ok(snapshot) => {
                info!(
                    message_id = %message_id,
                    collection_size = snapshot.len(),
                    "✅ Reprocessed message merged into collection"
                );
                log_message_operation("reprocess", Some(&message_id), "merged", None);
            }
            Err(error) => {
                let failed_at = state;
                advance(&mut state, ReprocessState::Failed, &message_id);
                warn!(
                    message_id = %message_id,
                    failed_at = %failed_at,
                    error = %error,
                    "❌ Reprocessing failed, collection left unchanged"
                );
                log_message_operation(
                    "reprocess",
                    Some(&message_id),
                    "failed",
                    Some(&error.to_string()),
                );
            }
        }
        result
    }

    async fn run(
        &self,
        message_id: &str,
        original: &RawMessage,
        messages: &SharedMessageCollection,
        state: &mut ReprocessState,
    ) -> NotifyResult<MessageCollection> {
        let endpoint = self.executor.endpoint(&self.endpoints.messages_link).await?;
        let href = format!(
            "{}/{}/{}",
            endpoint.trim_end_matches('/'),
            encode_path_segment(message_id),
            self.endpoints.reprocess_action
        );
        let request = RequestDescriptor::post(self.executor.generate_request_id(), href);
        let request_id = request.request_id;

        self.executor
            .send(request)
            .await
            .map_err(|e| NotifyError::reprocess_failed(message_id, None, e.to_string()))?;
        advance(state, ReprocessState::Submitted, message_id);

        let entry = self
            .executor
            .get_by_uuid(request_id)
            .await
            .map_err(|e| NotifyError::reprocess_failed(message_id, None, e.to_string()))?;
        if !entry.is_success() {
            return Err(NotifyError::reprocess_failed(
                message_id,
                Some(entry.status_code),
                entry
                    .error_message
                    .unwrap_or_else(|| "server rejected the reprocessing request".to_string()),
            ));
        }

        let Some(record) = entry.payload else {
            // server state unchanged: the displayed entry is already correct
            advance(state, ReprocessState::Resolved, message_id);
            advance(state, ReprocessState::Merged, message_id);
            return Ok(messages.snapshot());
        };
        let updated = authoritative_record(message_id, record, original)?;
        advance(state, ReprocessState::Resolved, message_id);

        let current = messages
            .get(message_id)
            .ok_or_else(|| NotifyError::message_not_found(message_id))?;
        let rebuilt = self.hydrator.rehydrate(updated, &current).await;
        let snapshot = messages.replace_by_id(rebuilt)?;
        advance(state, ReprocessState::Merged, message_id);
        Ok(snapshot)
    }

    fn acquire(&self, message_id: &str) -> NotifyResult<Option<InFlightGuard<'_>>> {
        if !self.single_flight {
            return Ok(None);
        }
        match self.in_flight.entry(message_id.to_string()) {
            Entry::Occupied(_) => Err(NotifyError::reprocess_in_flight(message_id)),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(Some(InFlightGuard {
                    in_flight: &self.in_flight,
                    message_id: message_id.to_string(),
                }))
            }
        }
    }
}

/// Validate the server's record and carry over references it omitted
fn authoritative_record(
    message_id: &str,
    mut record: RawMessage,
    original: &RawMessage,
) -> NotifyResult<RawMessage> {
    match record.identifier() {
        Some(returned) if returned != message_id => {
            return Err(NotifyError::reprocess_failed(
                message_id,
                None,
                format!("server returned record {returned}"),
            ));
        }
        Some(_) => {}
        None => record.id = Some(message_id.to_string()),
    }
    Ok(record.with_references_from(original))
}

fn advance(state: &mut ReprocessState, next: ReprocessState, message_id: &str) {
    debug_assert!(state.can_transition_to(next), "{state} -> {next}");
    debug!(message_id = %message_id, from = %state, to = %next, "Reprocess state transition");
    *state = next;
}
