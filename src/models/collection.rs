use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::error::{NotifyError, NotifyResult};
use crate::models::message::EnrichedMessage;

/// MessageCollection is the ordered list of messages a dashboard displays
///
/// Identifiers are present and unique for every element. The only mutation is
/// [`MessageCollection::replace_by_id`], which never reorders the remaining
/// elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MessageCollection {
    messages: Vec<EnrichedMessage>,
}

impl MessageCollection {
    pub fn new(messages: Vec<EnrichedMessage>) -> NotifyResult<Self> {
        let mut seen = HashSet::with_capacity(messages.len());
        for message in &messages {
            let id = message
                .identifier()
                .ok_or_else(|| NotifyError::malformed_message("collection entry without identifier"))?;
            if !seen.insert(id) {
                return Err(NotifyError::duplicate_identifier(id));
            }
        }
        Ok(Self { messages })
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[EnrichedMessage] {
        &self.messages
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.messages
            .iter()
            .position(|message| message.identifier() == Some(id))
    }

    pub fn get(&self, id: &str) -> Option<&EnrichedMessage> {
        self.position(id).map(|index| &self.messages[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Identifiers in display order
    pub fn identifiers(&self) -> Vec<&str> {
        self.messages.iter().filter_map(|m| m.identifier()).collect()
    }

    /// Replace the element sharing `replacement`'s identifier
    ///
    /// Returns the replaced element. Fails without touching the collection when
    /// the replacement has no identifier or no element carries it.
    pub fn replace_by_id(&mut self, replacement: EnrichedMessage) -> NotifyResult<EnrichedMessage> {
        let id = replacement
            .identifier()
            .ok_or_else(|| NotifyError::malformed_message("replacement without identifier"))?;
        let index = self
            .position(id)
            .ok_or_else(|| NotifyError::message_not_found(id))?;
        Ok(std::mem::replace(&mut self.messages[index], replacement))
    }

    /// Snapshot-in, snapshot-out form of [`MessageCollection::replace_by_id`]
    pub fn replaced(mut self, replacement: EnrichedMessage) -> NotifyResult<Self> {
        self.replace_by_id(replacement)?;
        Ok(self)
    }

    pub fn into_vec(self) -> Vec<EnrichedMessage> {
        self.messages
    }
}

impl<'a> IntoIterator for &'a MessageCollection {
    type Item = &'a EnrichedMessage;
    type IntoIter = std::slice::Iter<'a, EnrichedMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl TryFrom<Vec<EnrichedMessage>> for MessageCollection {
    type Error = NotifyError;

    fn try_from(messages: Vec<EnrichedMessage>) -> NotifyResult<Self> {
        Self::new(messages)
    }
}

/// Handle to a MessageCollection shared between the dashboard and the reprocessor
///
/// Readers take snapshots; the write lock is only held for a synchronous
/// replace and never across an await point.
#[derive(Debug, Clone, Default)]
pub struct SharedMessageCollection {
    inner: Arc<RwLock<MessageCollection>>,
}

impl SharedMessageCollection {
    pub fn new(collection: MessageCollection) -> Self {
        Self {
            inner: Arc::new(RwLock::new(collection)),
        }
    }

    pub fn snapshot(&self) -> MessageCollection {
        self.inner.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().contains(id)
    }

    pub fn get(&self, id: &str) -> Option<EnrichedMessage> {
        self.inner.read().get(id).cloned()
    }

    /// Replace one element and return the resulting snapshot
    ///
    /// Crate-private: the reprocessor is the only writer.
    pub(crate) fn replace_by_id(&self, replacement: EnrichedMessage) -> NotifyResult<MessageCollection> {
        let mut guard = self.inner.write();
        guard.replace_by_id(replacement)?;
        Ok(guard.clone())
    }
}

impl From<MessageCollection> for SharedMessageCollection {
    fn from(collection: MessageCollection) -> Self {
        Self::new(collection)
    }
}
