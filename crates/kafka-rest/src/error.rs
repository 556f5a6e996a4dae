use kafka_rest_types::ProduceRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected HTTP status {status}: {reason}")]
    UnexpectedStatus { status: u16, reason: String },

    #[error("Unexpected response HTTP {status}: [{error_code}] {message}")]
    UnexpectedResponse {
        status: u16,
        error_code: i64,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to consume messages; consumer is now closed")]
    ConsumerFailed(#[source] Box<Error>),

    #[error("Consumer is closed")]
    ConsumerClosed,

    #[error("Cannot close a closed consumer")]
    CloseClosed,

    #[error("Failed to produce some messages")]
    FailedToProduce(ProduceFailure),

    #[error("Consumer error: {0}")]
    Consumer(String),
}

impl Error {
    /// True for every error that leaves a consumer unusable.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ConsumerFailed(_) | Self::ConsumerClosed | Self::CloseClosed)
    }
}

/// Records rejected by the proxy, split by whether producing them again may
/// succeed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProduceFailure {
    pub retryable: Vec<FailedRecord>,
    pub non_retryable: Vec<FailedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRecord {
    pub error: String,
    pub record: ProduceRecord,
}

pub type Result<T> = std::result::Result<T, Error>;
