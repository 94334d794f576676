#![allow(clippy::doc_markdown)] // Allow technical terms like COAR, LDN in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # LDN Notify Core
//!
//! Enrichment and reprocessing core for the Linked Data Notification (LDN)
//! admin dashboard.
//!
//! ## Overview
//!
//! The notification REST API returns protocol-level records: queue status
//! codes, COAR Notify types, and bare identifiers of the LDN services and
//! repository items involved. This crate turns those records into
//! display-ready messages and keeps the dashboard's message list consistent
//! when an operator pushes a failed message back onto the queue.
//!
//! ## Module Organization
//!
//! - [`services`] - Label formatting, reference resolution, detail hydration, reprocessing
//! - [`collaborators`] - Traits for the request executor, directories and notification sink
//! - [`models`] - Raw and enriched messages, the shared message collection
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ldn_notify_core::collaborators::{
//!     InMemoryItemDirectory, InMemoryRequestExecutor, InMemoryServiceDirectory,
//! };
//! use ldn_notify_core::models::{LdnService, RawMessage};
//! use ldn_notify_core::{AdminNotifyMessagesService, NotifyConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! ldn_notify_core::logging::init_structured_logging();
//!
//! let service = AdminNotifyMessagesService::builder()
//!     .config(NotifyConfig::load()?)
//!     .request_executor(Arc::new(InMemoryRequestExecutor::new("https://rest.api/server/api/ldn")))
//!     .service_directory(Arc::new(
//!         InMemoryServiceDirectory::new().with_service(LdnService::new(1, "Review service")),
//!     ))
//!     .item_directory(Arc::new(InMemoryItemDirectory::new()))
//!     .build()?;
//!
//! let detailed = service
//!     .get_detailed_messages(vec![RawMessage::new("urn:uuid:1").with_origin(1)])
//!     .await;
//! assert_eq!(detailed[0].ldn_service, "Review service");
//! # Ok(())
//! # }
//! ```

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use config::NotifyConfig;
pub use constants::QueueStatus;
pub use error::{NotifyError, NotifyResult};
pub use models::{EnrichedMessage, MessageCollection, RawMessage, SharedMessageCollection};
pub use services::{
    format_message_labels, AdminNotifyMessagesService, DetailHydrator, ReferenceResolver,
    ReprocessState, Reprocessor,
};
