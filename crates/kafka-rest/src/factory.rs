//! Create a remote consumer instance, subscribe it and wrap it.

use crate::batch_consumer::{BatchConsumer, BatchLimits};
use crate::client::RestClient;
use crate::clock::{Clock, SystemClock};
use crate::consumer::Consumer;
use crate::error::Result;
use kafka_rest_types::{ConsumerInstance, ConsumerOptions, Subscription};
use std::sync::Arc;
use tracing::warn;

async fn subscribed_instance(
    client: &dyn RestClient,
    group: &str,
    subscription: &Subscription,
    options: Option<&ConsumerOptions>,
) -> Result<ConsumerInstance> {
    let default_options = ConsumerOptions::default();
    let options = options.unwrap_or(&default_options);
    let instance = client.create_consumer(group, options).await?;

    if let Err(e) = client.subscribe(&instance, subscription).await {
        if let Err(release) = client.delete_consumer(&instance).await {
            warn!(
                "Failed to release consumer instance {} after subscribe failed: {}",
                instance.instance_id, release
            );
        }
        return Err(e);
    }

    Ok(instance)
}

pub struct ConsumerFactory {
    client: Arc<dyn RestClient>,
}

impl ConsumerFactory {
    pub fn new(client: Arc<dyn RestClient>) -> Self {
        Self { client }
    }

    pub async fn create(
        &self,
        group: &str,
        subscription: &Subscription,
        options: Option<&ConsumerOptions>,
    ) -> Result<Consumer> {
        let instance =
            subscribed_instance(self.client.as_ref(), group, subscription, options).await?;
        Ok(Consumer::new(self.client.clone(), instance))
    }
}

pub struct BatchConsumerFactory {
    client: Arc<dyn RestClient>,
    clock: Arc<dyn Clock>,
}

impl BatchConsumerFactory {
    pub fn new(client: Arc<dyn RestClient>) -> Self {
        Self {
            client,
            clock: Arc::new(SystemClock),
        }
    }

    /// Clock handed to every consumer this factory creates
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The limits are validated before anything is created remotely.
    pub async fn create(
        &self,
        group: &str,
        subscription: &Subscription,
        max_count: Option<usize>,
        max_duration_secs: Option<u64>,
        options: Option<&ConsumerOptions>,
    ) -> Result<BatchConsumer> {
        let limits = BatchLimits::new(max_count, max_duration_secs)?;
        let instance =
            subscribed_instance(self.client.as_ref(), group, subscription, options).await?;
        Ok(
            BatchConsumer::with_limits(self.client.clone(), instance, limits)
                .with_clock(self.clock.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockRestClient;
    use crate::error::Error;
    use crate::testing::instance;
    use kafka_rest_types::AutoOffsetReset;
    use tokio_test::assert_ok;

    fn expect_create(client: &mut MockRestClient, group: &'static str, options: ConsumerOptions) {
        client
            .expect_create_consumer()
            .withf(move |g, o| g == group && *o == options)
            .times(1)
            .returning(|_, _| Ok(instance()));
    }

    #[tokio::test]
    async fn test_create_subscribes_consumer() {
        let options = ConsumerOptions {
            auto_offset_reset: Some(AutoOffsetReset::Earliest),
            ..Default::default()
        };
        let mut client = MockRestClient::new();
        expect_create(&mut client, "some-group", options.clone());
        client
            .expect_subscribe()
            .withf(|consumer, subscription| {
                *consumer == instance() && *subscription == Subscription::topic("some-topic")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        client.expect_delete_consumer().times(1).returning(|_| Ok(()));
        let factory = ConsumerFactory::new(Arc::new(client));

        let mut consumer = assert_ok!(
            factory
                .create("some-group", &Subscription::topic("some-topic"), Some(&options))
                .await
        );

        assert_eq!(consumer.instance(), Some(&instance()));
        assert_ok!(consumer.close().await);
    }

    #[tokio::test]
    async fn test_subscribe_failure_releases_instance() {
        let mut client = MockRestClient::new();
        expect_create(&mut client, "some-group", ConsumerOptions::default());
        client
            .expect_subscribe()
            .times(1)
            .returning(|_, _| Err(Error::Consumer("subscribe failed".to_string())));
        client
            .expect_delete_consumer()
            .withf(|consumer| *consumer == instance())
            .times(1)
            .returning(|_| Err(Error::Consumer("delete failed".to_string())));
        let factory = BatchConsumerFactory::new(Arc::new(client));

        let result = factory
            .create("some-group", &Subscription::pattern("t-.*"), Some(10), None, None)
            .await;

        assert!(matches!(result, Err(Error::Consumer(message)) if message == "subscribe failed"));
    }

    #[tokio::test]
    async fn test_invalid_limits_create_nothing() {
        let mut client = MockRestClient::new();
        client.expect_create_consumer().never();
        let factory = BatchConsumerFactory::new(Arc::new(client));

        let result = factory
            .create("some-group", &Subscription::topic("t"), None, None, None)
            .await;

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_batch_consumer_uses_default_options() {
        let mut client = MockRestClient::new();
        expect_create(&mut client, "g", ConsumerOptions::default());
        client
            .expect_subscribe()
            .withf(|_, subscription| *subscription == Subscription::topics(["a", "b"]))
            .times(1)
            .returning(|_, _| Ok(()));
        client.expect_delete_consumer().times(1).returning(|_| Ok(()));
        let factory = BatchConsumerFactory::new(Arc::new(client));

        let mut consumer = assert_ok!(
            factory
                .create("g", &Subscription::topics(["a", "b"]), None, Some(30), None)
                .await
        );

        assert_eq!(consumer.limits().max_count(), None);
        assert_ok!(consumer.close().await);
    }
}
