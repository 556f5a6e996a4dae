//! Wire value types for the Kafka REST Proxy v2 API.
//!
//! These types are shared between the `kafka-rest` client crate and the
//! `kafka-rest` CLI. They only describe data; every HTTP concern (paths,
//! headers, response envelopes) lives in the client crate.
//!
//! # Modules
//!
//! - [`message`] - records fetched by a consumer instance
//! - [`produce`] - records sent to a topic and the per-record results
//! - [`consumer`] - consumer instance handle, creation options, subscriptions
//! - [`offset`] - commit/seek offsets and topic partitions
//! - [`topic`] - topic and partition metadata
//!
//! Record keys and values travel base64 encoded (the proxy's `binary`
//! embedded format); the types here always hold the decoded bytes.

mod codec;
pub mod consumer;
pub mod message;
pub mod offset;
pub mod produce;
pub mod topic;

// Re-export main types for convenient access
pub use consumer::{AutoOffsetReset, ConsumerInstance, ConsumerOptions, Subscription};
pub use message::Message;
pub use offset::{CommittedOffset, Offset, TopicPartition};
pub use produce::{ProduceError, ProduceRecord, ProduceResult, RETRIABLE_ERROR_CODE};
pub use topic::{Partition, Replica, Topic};
