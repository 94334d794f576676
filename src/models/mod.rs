pub mod collection;
pub mod message;
pub mod remote;

// Re-export models for easy access
pub use collection::{MessageCollection, SharedMessageCollection};
pub use message::{EnrichedMessage, RawMessage};
pub use remote::{
    decode_path_segment, encode_path_segment, HttpMethod, ItemSummary, LdnService,
    RequestDescriptor, RequestEntry, RequestEntryState,
};
