//! # Collaborators
//!
//! Interfaces to the external components the core consumes, and in-memory
//! implementations of them.

pub mod in_memory;
pub mod traits;

pub use in_memory::{
    InMemoryItemDirectory, InMemoryRequestExecutor, InMemoryServiceDirectory, Notice,
    RecordingNotificationSink, ScriptedOutcome,
};
pub use traits::{
    ItemDirectory, NotificationSink, RequestExecutor, ServiceDirectory, TracingNotificationSink,
};
