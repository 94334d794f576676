pub mod detail_hydrator;
pub mod label_formatter;
pub mod messages_service;
pub mod reference_resolver;
pub mod reprocessor;

pub use detail_hydrator::DetailHydrator;
pub use label_formatter::{format_message_labels, status_label, type_label};
pub use messages_service::{AdminNotifyMessagesService, AdminNotifyMessagesServiceBuilder};
pub use reference_resolver::{ReferenceResolver, ResolvedReferences};
pub use reprocessor::{ReprocessState, Reprocessor};
