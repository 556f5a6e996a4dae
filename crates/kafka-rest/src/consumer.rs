use crate::client::RestClient;
use crate::error::{Error, Result};
use crate::lifecycle::ConsumerLifecycle;
use futures::stream::{self, Stream};
use kafka_rest_types::{ConsumerInstance, Message, Offset};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Called whenever a fetch comes back empty.
pub type IdleCallback = Box<dyn FnMut() + Send + Sync>;

/// Consumes a subscribed consumer instance one message at a time.
///
/// Each fetch uses the same timeout and max bytes hint. Failure and close
/// semantics match [`BatchConsumer`](crate::BatchConsumer), including the
/// release on drop, which may not run once the runtime is shutting down.
/// Prefer an explicit [`close`](Self::close).
pub struct Consumer {
    lifecycle: ConsumerLifecycle,
    on_idle: Option<IdleCallback>,
    buffer: VecDeque<Message>,
}

impl Consumer {
    pub fn new(client: Arc<dyn RestClient>, instance: ConsumerInstance) -> Self {
        Self {
            lifecycle: ConsumerLifecycle::new(client, instance),
            on_idle: None,
            buffer: VecDeque::new(),
        }
    }

    /// Run `callback` after every empty fetch, before fetching again.
    pub fn with_idle_callback(mut self, callback: impl FnMut() + Send + Sync + 'static) -> Self {
        self.on_idle = Some(Box::new(callback));
        self
    }

    pub fn instance(&self) -> Option<&ConsumerInstance> {
        self.lifecycle.instance().ok()
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Endless stream of messages. The stream ends after yielding an error.
    pub fn consume(
        &mut self,
        timeout: Option<Duration>,
        max_bytes: Option<u64>,
    ) -> impl Stream<Item = Result<Message>> + Send + '_ {
        stream::try_unfold(self, move |consumer| async move {
            let message = consumer.next_message(timeout, max_bytes).await?;
            Ok::<_, Error>(Some((message, consumer)))
        })
    }

    async fn next_message(
        &mut self,
        timeout: Option<Duration>,
        max_bytes: Option<u64>,
    ) -> Result<Message> {
        self.lifecycle.instance()?;

        loop {
            if let Some(message) = self.buffer.pop_front() {
                return Ok(message);
            }

            let messages = self.lifecycle.fetch(timeout, max_bytes).await?;
            if messages.is_empty() {
                if let Some(on_idle) = self.on_idle.as_mut() {
                    debug!("No messages received, running idle callback");
                    on_idle();
                }
            }
            self.buffer.extend(messages);
        }
    }

    /// Commit exactly this message's offset.
    pub async fn commit(&self, message: &Message) -> Result<()> {
        let instance = self.lifecycle.instance()?;
        let offset = Offset::new(message.topic.clone(), message.partition, message.offset);
        self.lifecycle
            .client()
            .commit_offsets(instance, std::slice::from_ref(&offset))
            .await
    }

    pub async fn close(&mut self) -> Result<()> {
        self.buffer.clear();
        self.lifecycle.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockRestClient;
    use crate::testing::{instance, message, messages};
    use futures::StreamExt;
    use mockall::Sequence;
    use std::error::Error as _;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn expect_fetches(client: &mut MockRestClient, timeout: Option<Duration>, chunks: Vec<Vec<Message>>) {
        let mut seq = Sequence::new();
        for chunk in chunks {
            client
                .expect_get_messages()
                .withf(move |_, t, _| *t == timeout)
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _, _| Ok(chunk.clone()));
        }
    }

    fn expect_delete(client: &mut MockRestClient) -> Arc<AtomicUsize> {
        let deletes = Arc::new(AtomicUsize::new(0));
        let counter = deletes.clone();
        client.expect_delete_consumer().times(1).returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        deletes
    }

    #[tokio::test]
    async fn test_yields_messages_one_by_one() {
        let mut client = MockRestClient::new();
        let mut seq = Sequence::new();
        for chunk in [messages(0..2), messages(2..3)] {
            client
                .expect_get_messages()
                .withf(|_, timeout, max_bytes| {
                    *timeout == Some(Duration::from_secs(5)) && *max_bytes == Some(512)
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _, _| Ok(chunk.clone()));
        }
        let deletes = expect_delete(&mut client);
        let mut consumer = Consumer::new(Arc::new(client), instance());

        let offsets: Vec<i64> = consumer
            .consume(Some(Duration::from_secs(5)), Some(512))
            .take(3)
            .map(|message| message.unwrap().offset)
            .collect()
            .await;

        assert_eq!(offsets, vec![0, 1, 2]);
        consumer.close().await.unwrap();
        assert_eq!(deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_idle_callback_runs_on_empty_fetch() {
        let idle = Arc::new(AtomicUsize::new(0));
        let counter = idle.clone();
        let mut client = MockRestClient::new();
        expect_fetches(&mut client, None, vec![vec![], vec![], messages(0..1)]);
        let deletes = expect_delete(&mut client);
        let mut consumer = Consumer::new(Arc::new(client), instance())
            .with_idle_callback(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let message = Box::pin(consumer.consume(None, None))
            .next()
            .await
            .unwrap()
            .unwrap();

        assert_eq!(message.offset, 0);
        assert_eq!(idle.load(Ordering::SeqCst), 2);
        consumer.close().await.unwrap();
        assert_eq!(deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_fetch_without_callback_fetches_again() {
        let mut client = MockRestClient::new();
        expect_fetches(&mut client, None, vec![vec![], messages(7..8)]);
        let deletes = expect_delete(&mut client);
        let mut consumer = Consumer::new(Arc::new(client), instance());

        let message = Box::pin(consumer.consume(None, None))
            .next()
            .await
            .unwrap()
            .unwrap();

        assert_eq!(message.offset, 7);
        consumer.close().await.unwrap();
        assert_eq!(deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_commit_single_offset() {
        let mut client = MockRestClient::new();
        client
            .expect_commit_offsets()
            .withf(|_, offsets| offsets == [Offset::new("some-topic", 2, 41)].as_slice())
            .times(1)
            .returning(|_, _| Ok(()));
        let deletes = expect_delete(&mut client);
        let mut consumer = Consumer::new(Arc::new(client), instance());

        consumer.commit(&message("some-topic", 2, 41)).await.unwrap();

        consumer.close().await.unwrap();
        assert_eq!(deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_then_closed() {
        let mut client = MockRestClient::new();
        client
            .expect_get_messages()
            .times(1)
            .returning(|_, _, _| Err(Error::Consumer("boom".to_string())));
        let deletes = expect_delete(&mut client);
        let mut consumer = Consumer::new(Arc::new(client), instance());

        let error = Box::pin(consumer.consume(None, None))
            .next()
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(error, Error::ConsumerFailed(_)));
        assert!(error.source().is_some());
        assert_eq!(deletes.load(Ordering::SeqCst), 1);

        let error = Box::pin(consumer.consume(None, None))
            .next()
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(error, Error::ConsumerClosed));
        assert!(error.source().is_none());
        assert_eq!(deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_twice() {
        let mut client = MockRestClient::new();
        client.expect_commit_offsets().never();
        let deletes = expect_delete(&mut client);
        let mut consumer = Consumer::new(Arc::new(client), instance());

        consumer.close().await.unwrap();
        assert!(consumer.is_closed());
        assert!(matches!(consumer.close().await, Err(Error::CloseClosed)));
        assert!(matches!(
            consumer.commit(&message("t", 0, 0)).await,
            Err(Error::ConsumerClosed)
        ));
        assert_eq!(deletes.load(Ordering::SeqCst), 1);
    }
}
