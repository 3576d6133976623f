// Per-connection snapshot delivery throttle.

use crate::use_cases::snapshot::SnapshotFrame;
use std::collections::BTreeSet;

/// Decides which snapshots a session may send and tracks unacknowledged ones.
#[derive(Debug)]
pub struct SnapshotThrottle {
    last_sent: Option<SnapshotFrame>,
    in_flight: BTreeSet<u64>,
    next_counter: u64,
    max_in_flight: usize,
}

impl SnapshotThrottle {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            last_sent: None,
            in_flight: BTreeSet::new(),
            next_counter: 1,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Returns the delivery counter to send `frame` with, or `None` when it must be skipped:
    /// the frame equals the last one sent, or too many snapshots are still unacknowledged.
    pub fn offer(&mut self, frame: &SnapshotFrame) -> Option<u64> {
        if self.in_flight.len() >= self.max_in_flight {
            return None;
        }
        if self.last_sent.as_ref() == Some(frame) {
            return None;
        }

        let counter = self.next_counter;
        self.next_counter += 1;
        self.in_flight.insert(counter);
        self.last_sent = Some(frame.clone());
        Some(counter)
    }

    /// Drops every in-flight counter up to and including `counter`.
    pub fn acknowledge(&mut self, counter: u64) {
        self.in_flight.retain(|&c| c > counter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::snapshot::{ShipSelectionView, StationView};

    fn frame(paused: bool) -> SnapshotFrame {
        SnapshotFrame {
            paused,
            view: StationView::ShipSelection(ShipSelectionView { ships: Vec::new() }),
        }
    }

    #[test]
    fn when_frame_is_unchanged_then_it_is_not_resent() {
        let mut throttle = SnapshotThrottle::new(3);

        assert_eq!(throttle.offer(&frame(false)), Some(1));
        assert_eq!(throttle.offer(&frame(false)), None);
        assert_eq!(throttle.offer(&frame(true)), Some(2));
    }

    #[test]
    fn when_ceiling_is_reached_then_frames_wait_for_an_ack() {
        let mut throttle = SnapshotThrottle::new(2);

        assert_eq!(throttle.offer(&frame(false)), Some(1));
        assert_eq!(throttle.offer(&frame(true)), Some(2));
        assert_eq!(throttle.offer(&frame(false)), None);

        throttle.acknowledge(1);
        assert_eq!(throttle.offer(&frame(false)), Some(3));
    }

    #[test]
    fn when_ack_arrives_then_all_earlier_counters_are_released() {
        let mut throttle = SnapshotThrottle::new(5);
        for paused in [false, true, false, true] {
            throttle.offer(&frame(paused));
        }

        throttle.acknowledge(3);

        assert_eq!(throttle.in_flight(), 1);
    }

    #[test]
    fn when_ack_is_stale_or_unknown_then_nothing_breaks() {
        let mut throttle = SnapshotThrottle::new(3);
        throttle.acknowledge(42);
        throttle.acknowledge(0);

        assert_eq!(throttle.offer(&frame(false)), Some(1));
        assert_eq!(throttle.in_flight(), 1);
    }
}
