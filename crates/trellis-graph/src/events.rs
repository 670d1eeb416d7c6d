// crates/trellis-graph/src/events.rs
//
// Append-only output log of committed domain events.
//
// Events are sequenced by `stage` before the call is persisted and only
// appended and broadcast once it is. Subscribers either poll with their own
// cursor (`events_since`) or attach a live tokio broadcast receiver. Publishing never depends on anyone
// listening: a send with no receivers is dropped silently, and a lagging
// receiver can always catch up from the log.

use tokio::sync::broadcast;

use trellis_core::{GraphEvent, SequencedEvent, Timestamp};

/// Capacity of the live broadcast channel.
const BROADCAST_CAPACITY: usize = 1024;

#[derive(Debug)]
pub struct EventLog {
    /// Sequence number of `entries[0]`.
    base_seq: u64,
    entries: Vec<SequencedEvent>,
    sender: broadcast::Sender<SequencedEvent>,
}

impl EventLog {
    /// A log whose first event will carry `next_seq`.
    pub fn starting_at(next_seq: u64) -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            base_seq: next_seq,
            entries: Vec::new(),
            sender,
        }
    }

    /// Assign sequence numbers without recording anything.
    pub fn stage(&self, at: Timestamp, events: Vec<GraphEvent>) -> Vec<SequencedEvent> {
        let first = self.next_seq();
        events
            .into_iter()
            .zip(first..)
            .map(|(event, seq)| SequencedEvent { seq, at, event })
            .collect()
    }

    /// Append staged events and fan them out to live subscribers.
    pub fn append(&mut self, staged: Vec<SequencedEvent>) {
        for sequenced in staged {
            debug_assert_eq!(sequenced.seq, self.next_seq());
            self.entries.push(sequenced.clone());
            // No receivers is not an error.
            let _ = self.sender.send(sequenced);
        }
    }

    pub fn next_seq(&self) -> u64 {
        self.base_seq + self.entries.len() as u64
    }

    /// Events with `seq >= cursor` held by this log.
    pub fn events_since(&self, cursor: u64) -> &[SequencedEvent] {
        let start = cursor.saturating_sub(self.base_seq) as usize;
        self.entries.get(start..).unwrap_or(&[])
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SequencedEvent> {
        self.sender.subscribe()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removed(edge_id: u64) -> GraphEvent {
        GraphEvent::EdgeRemoved { edge_id, refunded: 0 }
    }

    fn publish(log: &mut EventLog, at: Timestamp, events: Vec<GraphEvent>) {
        let staged = log.stage(at, events);
        log.append(staged);
    }

    #[test]
    fn test_append_without_subscribers() {
        let mut log = EventLog::starting_at(0);
        let staged = log.stage(10, vec![removed(1), removed(2)]);
        assert_eq!(staged[1].seq, 1);
        log.append(staged);
        assert_eq!(log.next_seq(), 2);
    }

    #[test]
    fn test_staged_events_are_not_visible() {
        let log = EventLog::starting_at(3);
        let mut rx = log.subscribe();
        let staged = log.stage(1, vec![removed(1)]);
        assert_eq!(staged[0].seq, 3);
        assert!(log.is_empty());
        assert!(log.events_since(0).is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_cursor_reads() {
        let mut log = EventLog::starting_at(5);
        publish(&mut log, 1, vec![removed(1), removed(2), removed(3)]);
        assert_eq!(log.events_since(0).len(), 3);
        assert_eq!(log.events_since(6).len(), 2);
        assert_eq!(log.events_since(6)[0].seq, 6);
        assert!(log.events_since(8).is_empty());
        assert!(log.events_since(100).is_empty());
    }

    #[test]
    fn test_independent_subscribers() {
        let mut log = EventLog::starting_at(0);
        let mut first = log.subscribe();
        publish(&mut log, 1, vec![removed(1)]);
        let mut second = log.subscribe();
        publish(&mut log, 2, vec![removed(2)]);

        assert_eq!(first.try_recv().unwrap().seq, 0);
        assert_eq!(first.try_recv().unwrap().seq, 1);
        assert_eq!(second.try_recv().unwrap().seq, 1);
        assert!(second.try_recv().is_err());
    }
}
