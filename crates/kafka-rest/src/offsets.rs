use crate::batch::MessageBatch;
use kafka_rest_types::Offset;
use std::collections::HashSet;

/// Reduce a batch to one offset per topic partition: the offset of the
/// partition's last message in the batch.
///
/// The batch is scanned from the end, so the first message seen for a
/// partition wins. Results come out in that reverse order of first
/// appearance. Offsets within a partition are assumed to be increasing,
/// which holds for anything received from a single consumer.
pub fn reduce_offsets(batch: &MessageBatch) -> Vec<Offset> {
    let mut seen = HashSet::new();

    batch
        .messages()
        .iter()
        .rev()
        .filter(|m| seen.insert((m.topic.as_str(), m.partition)))
        .map(|m| Offset::new(m.topic.clone(), m.partition, m.offset))
        .collect()
}
