use crate::client::RestClient;
use crate::error::{Error, FailedRecord, ProduceFailure, Result};
use kafka_rest_types::ProduceRecord;
use std::sync::Arc;
use tracing::{debug, warn};

/// Produces records to a topic and reports the ones the proxy rejected.
#[derive(Clone)]
pub struct Producer {
    client: Arc<dyn RestClient>,
}

impl Producer {
    pub fn new(client: Arc<dyn RestClient>) -> Self {
        Self { client }
    }

    pub async fn produce(&self, topic: &str, record: ProduceRecord) -> Result<()> {
        self.produce_batch(topic, vec![record]).await
    }

    /// Produce `records` in one request.
    ///
    /// Fails with [`Error::FailedToProduce`] if any record was rejected; the
    /// failure lists the rejected records split into retryable (error code 2)
    /// and non-retryable ones. Records that were accepted are not repeated.
    pub async fn produce_batch(&self, topic: &str, records: Vec<ProduceRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let results = self.client.produce(topic, &records).await?;
        debug!("Produced {} records to {}", records.len(), topic);

        let mut failure = ProduceFailure::default();
        for (result, record) in results.into_iter().zip(records) {
            let Some(error) = result.error() else {
                continue;
            };
            let failed = FailedRecord {
                error: error.error.clone(),
                record,
            };
            if error.is_retriable() {
                failure.retryable.push(failed);
            } else {
                failure.non_retryable.push(failed);
            }
        }

        if failure.retryable.is_empty() && failure.non_retryable.is_empty() {
            return Ok(());
        }

        warn!(
            "Failed to produce {} records to {} ({} retryable)",
            failure.retryable.len() + failure.non_retryable.len(),
            topic,
            failure.retryable.len()
        );
        Err(Error::FailedToProduce(failure))
    }
}
