//! Kafka REST Proxy client.
//!
//! This crate provides:
//! - `RestClient`, the typed operations of the proxy's v2 API, and
//!   `HttpRestClient`, its reqwest implementation
//! - `Consumer`, yielding one message at a time
//! - `BatchConsumer`, yielding batches bounded by count and/or time, and
//!   committing a batch as one offset per partition
//! - `Producer`, reporting rejected records split by retriability
//! - Factories creating and subscribing consumer instances
//!
//! A consumer owns its remote consumer instance: it is deleted exactly once,
//! on explicit close, when a fetch fails, or when the consumer is dropped.

pub mod batch;
pub mod batch_consumer;
pub mod client;
pub mod clock;
pub mod config;
pub mod consumer;
pub mod error;
pub mod factory;
pub mod http;
mod lifecycle;
pub mod offsets;
pub mod producer;

#[cfg(test)]
mod testing;

pub use batch::MessageBatch;
pub use batch_consumer::{BatchConsumer, BatchLimits, DEFAULT_FETCH_TIMEOUT};
pub use client::RestClient;
pub use clock::{Clock, FrozenClock, SystemClock};
pub use config::ClientConfig;
pub use consumer::{Consumer, IdleCallback};
pub use error::{Error, FailedRecord, ProduceFailure, Result};
pub use factory::{BatchConsumerFactory, ConsumerFactory};
pub use http::HttpRestClient;
pub use offsets::reduce_offsets;
pub use producer::Producer;

pub use kafka_rest_types::{
    AutoOffsetReset, CommittedOffset, ConsumerInstance, ConsumerOptions, Message, Offset,
    Partition, ProduceError, ProduceRecord, ProduceResult, Replica, Subscription, Topic,
    TopicPartition,
};
