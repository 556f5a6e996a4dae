//! Records fetched by a consumer instance.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::codec;

/// A record fetched from `GET {base_uri}/records`.
///
/// Immutable once received: consumers hand these out by value and batches
/// only ever append them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    /// Kafka topic name
    pub topic: String,
    /// Kafka partition number
    pub partition: i32,
    /// Decoded record key (if any)
    #[serde(default, with = "codec::optional_bytes")]
    pub key: Option<Vec<u8>>,
    /// Decoded record value
    #[serde(rename = "value", with = "codec::bytes")]
    pub content: Vec<u8>,
    /// Kafka offset within the partition
    pub offset: i64,
    /// Record timestamp in milliseconds since epoch (if the proxy sent one)
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl Message {
    /// Record timestamp as a UTC date time.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::from_timestamp_millis)
    }

    /// Record value as UTF-8, replacing invalid sequences.
    pub fn content_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
