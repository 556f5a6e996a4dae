//! Topic and partition metadata.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Topic metadata from `GET /topics/{topic}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Topic {
    pub name: String,
    /// Per-topic config overrides (e.g. `retention.bytes`)
    #[serde(default)]
    pub configs: BTreeMap<String, String>,
    #[serde(default)]
    pub partitions: Vec<Partition>,
}

/// Partition metadata with its replica set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Partition {
    pub partition: i32,
    /// Broker id of the current leader
    pub leader: i32,
    #[serde(default)]
    pub replicas: Vec<Replica>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Replica {
    pub broker: i32,
    pub leader: bool,
    pub in_sync: bool,
}

impl Partition {
    /// Number of replicas currently in sync with the leader.
    pub fn in_sync_replicas(&self) -> usize {
        self.replicas.iter().filter(|r| r.in_sync).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_deserialize() {
        let json = r#"{
            "name": "lorem-ipsum",
            "configs": {"retention.bytes": "-1", "flush.ms": "50000"},
            "partitions": [
                {
                    "partition": 0,
                    "leader": 0,
                    "replicas": [
                        {"broker": 0, "leader": true, "in_sync": true},
                        {"broker": 1, "leader": false, "in_sync": false}
                    ]
                }
            ]
        }"#;

        let topic: Topic = serde_json::from_str(json).unwrap();

        assert_eq!(topic.name, "lorem-ipsum");
        assert_eq!(topic.configs.get("flush.ms").map(String::as_str), Some("50000"));
        assert_eq!(topic.partitions.len(), 1);
        assert_eq!(topic.partitions[0].replicas.len(), 2);
        assert!(topic.partitions[0].replicas[0].leader);
        assert_eq!(topic.partitions[0].in_sync_replicas(), 1);
    }
}
