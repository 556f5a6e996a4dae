//! Message and consumer instance builders for unit tests.

use kafka_rest_types::{ConsumerInstance, Message};

pub(crate) fn message(topic: &str, partition: i32, offset: i64) -> Message {
    Message {
        topic: topic.to_string(),
        partition,
        key: None,
        content: format!("{topic}-{partition}-{offset}").into_bytes(),
        offset,
        timestamp: None,
    }
}

pub(crate) fn messages(offsets: std::ops::Range<i64>) -> Vec<Message> {
    offsets.map(|offset| message("some-topic", 0, offset)).collect()
}

pub(crate) fn instance() -> ConsumerInstance {
    ConsumerInstance {
        instance_id: "some-instance".to_string(),
        base_uri: "http://proxy/consumers/some-group/instances/some-instance".to_string(),
    }
}
