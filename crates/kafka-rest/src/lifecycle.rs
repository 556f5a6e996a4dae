use crate::client::RestClient;
use crate::error::{Error, Result};
use kafka_rest_types::{ConsumerInstance, Message};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Open/closed state of a remote consumer instance, shared by both consumers.
///
/// The instance is held in an `Option` that every release path takes, so it
/// is deleted at most once whether the consumer is closed explicitly, fails
/// while fetching, or is dropped.
///
/// Release on drop is a detached task on the current runtime. It is lost if
/// the runtime shuts down before polling it.
pub(crate) struct ConsumerLifecycle {
    client: Arc<dyn RestClient>,
    instance: Option<ConsumerInstance>,
}

impl ConsumerLifecycle {
    pub fn new(client: Arc<dyn RestClient>, instance: ConsumerInstance) -> Self {
        Self {
            client,
            instance: Some(instance),
        }
    }

    pub fn client(&self) -> &dyn RestClient {
        self.client.as_ref()
    }

    pub fn instance(&self) -> Result<&ConsumerInstance> {
        self.instance.as_ref().ok_or(Error::ConsumerClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.instance.is_none()
    }

    pub async fn close(&mut self) -> Result<()> {
        let instance = self.instance.take().ok_or(Error::CloseClosed)?;
        info!("Closing consumer instance {}", instance.instance_id);
        self.client.delete_consumer(&instance).await
    }

    /// Release the instance after `cause` made it unusable and return the
    /// error to surface. A failing release is logged, not returned.
    pub async fn fail(&mut self, cause: Error) -> Error {
        if let Some(instance) = self.instance.take() {
            warn!(
                "Consumer instance {} failed, releasing it: {}",
                instance.instance_id, cause
            );
            if let Err(e) = self.client.delete_consumer(&instance).await {
                warn!(
                    "Failed to release consumer instance {}: {}",
                    instance.instance_id, e
                );
            }
        }
        Error::ConsumerFailed(Box::new(cause))
    }

    /// Fetch the next records, closing the consumer if the fetch fails.
    pub async fn fetch(
        &mut self,
        timeout: Option<Duration>,
        max_bytes: Option<u64>,
    ) -> Result<Vec<Message>> {
        let instance = self.instance()?;
        let result = self
            .client
            .get_messages(instance, timeout, max_bytes)
            .await;

        match result {
            Ok(messages) => {
                debug!("Fetched {} messages", messages.len());
                Ok(messages)
            }
            Err(e) => Err(self.fail(e).await),
        }
    }
}

impl Drop for ConsumerLifecycle {
    fn drop(&mut self) {
        let Some(instance) = self.instance.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let client = self.client.clone();
                handle.spawn(async move {
                    if let Err(e) = client.delete_consumer(&instance).await {
                        warn!(
                            "Failed to release consumer instance {} on drop: {}",
                            instance.instance_id, e
                        );
                    }
                });
            }
            Err(_) => warn!(
                "No async runtime to release consumer instance {} on drop",
                instance.instance_id
            ),
        }
    }
}
