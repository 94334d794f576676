//! # Notify Error Types
//!
//! Structured error handling for enrichment and reprocessing using thiserror
//! instead of `Box<dyn Error>` patterns.

use thiserror::Error;

/// Errors surfaced by the enrichment and reprocessing core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("Malformed message: {reason}")]
    MalformedMessage { reason: String },

    #[error("Message not found in collection: {message_id}")]
    MessageNotFound { message_id: String },

    #[error("Duplicate message identifier in collection: {message_id}")]
    DuplicateIdentifier { message_id: String },

    #[error("Lookup failed: {directory}: {reference}: {message}")]
    LookupFailed {
        directory: String,
        reference: String,
        message: String,
    },

    #[error("Reprocessing failed for message {message_id}: {message}")]
    ReprocessFailed {
        message_id: String,
        status_code: Option<u16>,
        message: String,
    },

    #[error("Reprocessing already in flight for message {message_id}")]
    ReprocessInFlight { message_id: String },

    #[error("Request executor error: {operation}: {message}")]
    RequestExecutor { operation: String, message: String },

    #[error("Configuration error: {component}: {message}")]
    Configuration { component: String, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl NotifyError {
    /// Create a malformed message error
    pub fn malformed_message(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }

    /// Create a message not found error
    pub fn message_not_found(message_id: impl Into<String>) -> Self {
        Self::MessageNotFound {
            message_id: message_id.into(),
        }
    }

    /// Create a duplicate identifier error
    pub fn duplicate_identifier(message_id: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            message_id: message_id.into(),
        }
    }

    /// Create a lookup failure for one of the reference directories
    pub fn lookup_failed(
        directory: impl Into<String>,
        reference: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::LookupFailed {
            directory: directory.into(),
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a reprocessing failure
    pub fn reprocess_failed(
        message_id: impl Into<String>,
        status_code: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::ReprocessFailed {
            message_id: message_id.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create an in-flight rejection
    pub fn reprocess_in_flight(message_id: impl Into<String>) -> Self {
        Self::ReprocessInFlight {
            message_id: message_id.into(),
        }
    }

    /// Create a request executor error
    pub fn request_executor(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestExecutor {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether the caller can resubmit the same action later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ReprocessFailed { .. } | Self::ReprocessInFlight { .. } | Self::RequestExecutor { .. }
        )
    }
}

/// Conversion from serde_json::Error to NotifyError
impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        NotifyError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from config::ConfigError to NotifyError
impl From<config::ConfigError> for NotifyError {
    fn from(err: config::ConfigError) -> Self {
        NotifyError::configuration("loader", err.to_string())
    }
}

/// Result type alias for notify operations
pub type NotifyResult<T> = Result<T, NotifyError>;
