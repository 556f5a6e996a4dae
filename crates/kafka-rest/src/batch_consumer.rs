//! Consumer that groups records into batches bounded by count and/or time.

use crate::batch::MessageBatch;
use crate::client::RestClient;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::lifecycle::ConsumerLifecycle;
use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{self, Stream};
use kafka_rest_types::{ConsumerInstance, Message};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Fetch timeout used when batches are only bounded by count.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Bounds of a batch window. At least one is always set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    max_count: Option<usize>,
    max_duration: Option<TimeDelta>,
}

impl BatchLimits {
    pub fn new(max_count: Option<usize>, max_duration_secs: Option<u64>) -> Result<Self> {
        if max_count.is_none() && max_duration_secs.is_none() {
            return Err(Error::InvalidConfig(
                "You must specify at least one of max_count/max_duration".to_string(),
            ));
        }
        if max_count == Some(0) {
            return Err(Error::InvalidConfig(
                "max_count must be greater than zero".to_string(),
            ));
        }

        let max_duration = match max_duration_secs {
            Some(0) => {
                return Err(Error::InvalidConfig(
                    "max_duration must be greater than zero".to_string(),
                ))
            }
            Some(secs) => Some(
                i64::try_from(secs)
                    .ok()
                    .and_then(TimeDelta::try_seconds)
                    .filter(|d| Utc::now().checked_add_signed(*d).is_some())
                    .ok_or_else(|| {
                        Error::InvalidConfig(format!("max_duration of {secs}s is out of range"))
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            max_count,
            max_duration,
        })
    }

    pub fn max_count(&self) -> Option<usize> {
        self.max_count
    }

    pub fn max_duration(&self) -> Option<TimeDelta> {
        self.max_duration
    }
}

/// Consumes a subscribed consumer instance in batches.
///
/// A batch window opens when the next batch is requested. Every received
/// message is added to the batch and the bounds are checked after each one:
/// the batch is yielded as soon as it holds `max_count` messages or the
/// window's deadline has passed, whichever comes first. A time bounded window
/// that ends without messages yields an empty batch.
///
/// With a duration bound, every fetch waits at most until the deadline, so
/// the window closes on time even when the topic is idle.
///
/// A failing fetch releases the consumer instance and surfaces
/// [`Error::ConsumerFailed`] with the cause; any later use fails with
/// [`Error::ConsumerClosed`].
///
/// Dropping a consumer that is still open spawns the release on the current
/// tokio runtime. That task does not run if the runtime is shutting down, and
/// the instance then stays on the proxy until it expires, so call
/// [`close`](Self::close) before leaving the runtime.
pub struct BatchConsumer {
    lifecycle: ConsumerLifecycle,
    limits: BatchLimits,
    clock: Arc<dyn Clock>,
    window: Option<Window>,
    // Fetched past the end of the open window
    pending: VecDeque<Message>,
}

/// The batch being collected and when it has to be yielded.
struct Window {
    deadline: Option<DateTime<Utc>>,
    batch: MessageBatch,
}

impl Window {
    fn is_full(&self, limits: &BatchLimits, now: DateTime<Utc>) -> bool {
        let count_reached = limits
            .max_count
            .is_some_and(|max_count| self.batch.count() >= max_count);
        count_reached || self.is_expired(now)
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left until the deadline, rounded up to whole seconds.
    fn fetch_timeout(&self, now: DateTime<Utc>) -> Duration {
        match self.deadline {
            Some(deadline) => {
                let remaining = (deadline - now).to_std().unwrap_or_default();
                Duration::from_secs(remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0))
            }
            None => DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl BatchConsumer {
    pub fn new(
        client: Arc<dyn RestClient>,
        instance: ConsumerInstance,
        max_count: Option<usize>,
        max_duration_secs: Option<u64>,
    ) -> Result<Self> {
        let limits = BatchLimits::new(max_count, max_duration_secs)?;
        Ok(Self::with_limits(client, instance, limits))
    }

    pub fn with_limits(
        client: Arc<dyn RestClient>,
        instance: ConsumerInstance,
        limits: BatchLimits,
    ) -> Self {
        Self {
            lifecycle: ConsumerLifecycle::new(client, instance),
            limits,
            clock: Arc::new(SystemClock),
            window: None,
            pending: VecDeque::new(),
        }
    }

    /// Replace the time source driving batch windows
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// The consumer instance, or `None` once closed
    pub fn instance(&self) -> Option<&ConsumerInstance> {
        self.lifecycle.instance().ok()
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Endless stream of batches. The stream ends after yielding an error.
    pub fn consume(
        &mut self,
        max_bytes: Option<u64>,
    ) -> impl Stream<Item = Result<MessageBatch>> + Send + '_ {
        stream::try_unfold(self, move |consumer| async move {
            let batch = consumer.next_batch(max_bytes).await?;
            Ok::<_, Error>(Some((batch, consumer)))
        })
    }

    /// Collect the next batch, fetching as often as the window requires.
    ///
    /// Cancel safe: the open window and the messages collected so far stay on
    /// the consumer, so dropping this future resumes the same window on the
    /// next call.
    pub async fn next_batch(&mut self, max_bytes: Option<u64>) -> Result<MessageBatch> {
        self.lifecycle.instance()?;

        if self.window.is_none() {
            self.window = Some(self.open_window()?);
        }

        loop {
            if let Some(batch) = self.fill_window() {
                return Ok(batch);
            }

            let timeout = match &self.window {
                Some(window) => window.fetch_timeout(self.clock.now()),
                None => DEFAULT_FETCH_TIMEOUT,
            };
            let messages = self.lifecycle.fetch(Some(timeout), max_bytes).await?;
            self.pending.extend(messages);
        }
    }

    /// Commit the last offset of every partition in `batch`.
    /// An empty batch commits nothing.
    pub async fn commit(&self, batch: &MessageBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let instance = self.lifecycle.instance()?;
        let offsets = batch.offsets();
        debug!(
            "Committing {} offsets for {} messages",
            offsets.len(),
            batch.count()
        );
        self.lifecycle
            .client()
            .commit_offsets(instance, &offsets)
            .await
    }

    /// Release the consumer instance. Closing twice fails with
    /// [`Error::CloseClosed`].
    pub async fn close(&mut self) -> Result<()> {
        self.window = None;
        self.pending.clear();
        self.lifecycle.close().await
    }

    fn open_window(&self) -> Result<Window> {
        let deadline = match self.limits.max_duration {
            Some(max_duration) => Some(
                self.clock
                    .now()
                    .checked_add_signed(max_duration)
                    .ok_or_else(|| {
                        Error::InvalidConfig(format!(
                            "max_duration of {}s is out of range",
                            max_duration.num_seconds()
                        ))
                    })?,
            ),
            None => None,
        };
        Ok(Window {
            deadline,
            batch: MessageBatch::new(),
        })
    }

    /// Move pending messages into the open window and take its batch once it
    /// is full or expired.
    fn fill_window(&mut self) -> Option<MessageBatch> {
        let window = self.window.as_mut()?;
        let now = self.clock.now();

        while let Some(message) = self.pending.pop_front() {
            window.batch.add(message);
            if window.is_full(&self.limits, now) {
                debug!("Flushing batch of {} messages", window.batch.count());
                return self.window.take().map(|window| window.batch);
            }
        }

        if window.is_expired(now) {
            debug!("Flushing batch of {} messages on deadline", window.batch.count());
            return self.window.take().map(|window| window.batch);
        }
        None
    }
}
