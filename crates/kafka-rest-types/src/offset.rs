//! Commit/seek offsets and topic partitions.

use serde::{Deserialize, Serialize};

/// An offset sent to the proxy for committing or seeking.
///
/// For commits this means "everything up to this offset in this partition
/// has been processed".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

impl Offset {
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
        }
    }
}

/// A topic partition, used both in requests (assign, seek, committed
/// offsets) and in the assignments response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: i32,
}

impl TopicPartition {
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
        }
    }
}

/// Last committed offset of a partition, from `GET {base_uri}/offsets`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommittedOffset {
    #[serde(default)]
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    #[serde(default)]
    pub metadata: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_serialization() {
        let json = serde_json::to_string(&Offset::new("some-topic", 1, 12)).unwrap();
        assert_eq!(json, r#"{"topic":"some-topic","partition":1,"offset":12}"#);
    }

    #[test]
    fn test_committed_offset_deserialize() {
        let json = r#"{"topic":"t","partition":2,"offset":10,"metadata":""}"#;
        let offset: CommittedOffset = serde_json::from_str(json).unwrap();
        assert_eq!(offset.topic, "t");
        assert_eq!(offset.partition, 2);
        assert_eq!(offset.offset, 10);
        assert_eq!(offset.metadata.as_deref(), Some(""));
    }
}
