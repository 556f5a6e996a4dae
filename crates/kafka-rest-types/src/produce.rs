//! Records sent to a topic and the per-record results.

use serde::{Deserialize, Serialize};

use crate::codec;

/// Error code the proxy reports for failures worth retrying (a retriable
/// Kafka exception on the broker side).
pub const RETRIABLE_ERROR_CODE: i32 = 2;

/// A record to produce. Key and value are base64 encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProduceRecord {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "codec::optional_bytes::serialize"
    )]
    pub key: Option<Vec<u8>>,
    #[serde(rename = "value", serialize_with = "codec::bytes::serialize")]
    pub content: Vec<u8>,
}

impl ProduceRecord {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            key: None,
            content: content.into(),
        }
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Outcome of producing a single record.
///
/// The proxy reports either a partition/offset pair or an error code and
/// message, positionally matching the records of the request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ProduceResult {
    #[serde(default)]
    pub partition: Option<i32>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub error_code: Option<i32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error half of a failed [`ProduceResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProduceError {
    pub error_code: i32,
    pub error: String,
}

impl ProduceError {
    pub fn is_retriable(&self) -> bool {
        self.error_code == RETRIABLE_ERROR_CODE
    }
}

impl ProduceResult {
    pub fn is_error(&self) -> bool {
        self.error_code.is_some()
    }

    pub fn error(&self) -> Option<ProduceError> {
        self.error_code.map(|error_code| ProduceError {
            error_code,
            error: self.error.clone().unwrap_or_default(),
        })
    }

    /// Partition and offset the record was written to, if it succeeded.
    pub fn position(&self) -> Option<(i32, i64)> {
        if self.is_error() {
            return None;
        }
        Some((self.partition.unwrap_or_default(), self.offset.unwrap_or_default()))
    }
}
