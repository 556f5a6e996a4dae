use crate::error::Result;
use async_trait::async_trait;
use kafka_rest_types::{
    CommittedOffset, ConsumerInstance, ConsumerOptions, Message, Offset, Partition,
    ProduceRecord, ProduceResult, Subscription, Topic, TopicPartition,
};
use std::time::Duration;

/// Typed operations of the Kafka REST Proxy v2 API.
///
/// [`HttpRestClient`](crate::HttpRestClient) talks to a real proxy; consumers,
/// the producer and the factories only depend on this trait, so any other
/// implementation (a test double, a different transport) can stand in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestClient: Send + Sync {
    /// `GET /topics`
    async fn list_topics(&self) -> Result<Vec<String>>;

    /// `GET /topics/{topic}`
    async fn get_topic(&self, topic: &str) -> Result<Topic>;

    /// `POST /topics/{topic}`
    ///
    /// Results are positional: the n-th result belongs to the n-th record.
    async fn produce(&self, topic: &str, records: &[ProduceRecord]) -> Result<Vec<ProduceResult>>;

    /// `GET /topics/{topic}/partitions`
    async fn list_partitions(&self, topic: &str) -> Result<Vec<Partition>>;

    /// `GET /topics/{topic}/partitions/{partition}`
    async fn get_partition(&self, topic: &str, partition: i32) -> Result<Partition>;

    /// `POST /topics/{topic}/partitions/{partition}`
    async fn produce_to_partition(
        &self,
        topic: &str,
        partition: i32,
        records: &[ProduceRecord],
    ) -> Result<Vec<ProduceResult>>;

    /// `POST /consumers/{group}`
    async fn create_consumer(
        &self,
        group: &str,
        options: &ConsumerOptions,
    ) -> Result<ConsumerInstance>;

    /// `DELETE {base_uri}`
    async fn delete_consumer(&self, consumer: &ConsumerInstance) -> Result<()>;

    /// `POST {base_uri}/offsets` with the given offsets
    ///
    /// The proxy commits `offset + 1` for every given offset, so callers pass
    /// the offset of the last processed record.
    async fn commit_offsets(&self, consumer: &ConsumerInstance, offsets: &[Offset]) -> Result<()>;

    /// `POST {base_uri}/offsets` without a body, committing the instance's
    /// current position on every assigned partition
    async fn commit_positions(&self, consumer: &ConsumerInstance) -> Result<()>;

    /// `GET {base_uri}/offsets`
    async fn committed_offsets(
        &self,
        consumer: &ConsumerInstance,
        partitions: &[TopicPartition],
    ) -> Result<Vec<CommittedOffset>>;

    /// `POST {base_uri}/subscription`
    async fn subscribe(&self, consumer: &ConsumerInstance, subscription: &Subscription)
        -> Result<()>;

    /// `GET {base_uri}/subscription`
    async fn subscribed_topics(&self, consumer: &ConsumerInstance) -> Result<Vec<String>>;

    /// `DELETE {base_uri}/subscription`
    async fn unsubscribe(&self, consumer: &ConsumerInstance) -> Result<()>;

    /// `POST {base_uri}/assignments`
    async fn assign_partitions(
        &self,
        consumer: &ConsumerInstance,
        partitions: &[TopicPartition],
    ) -> Result<()>;

    /// `GET {base_uri}/assignments`
    async fn assigned_partitions(&self, consumer: &ConsumerInstance)
        -> Result<Vec<TopicPartition>>;

    /// `POST {base_uri}/positions`
    async fn seek(&self, consumer: &ConsumerInstance, offsets: &[Offset]) -> Result<()>;

    /// `POST {base_uri}/positions/beginning`
    async fn seek_to_beginning(
        &self,
        consumer: &ConsumerInstance,
        partitions: &[TopicPartition],
    ) -> Result<()>;

    /// `POST {base_uri}/positions/end`
    async fn seek_to_end(
        &self,
        consumer: &ConsumerInstance,
        partitions: &[TopicPartition],
    ) -> Result<()>;

    /// `GET {base_uri}/records`
    ///
    /// May return an empty list once `timeout` elapses without records;
    /// `None` leaves the timeout to the proxy's default.
    async fn get_messages(
        &self,
        consumer: &ConsumerInstance,
        timeout: Option<Duration>,
        max_bytes: Option<u64>,
    ) -> Result<Vec<Message>>;

    /// `GET /brokers`
    async fn brokers(&self) -> Result<Vec<i32>>;
}
