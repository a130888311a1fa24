//! Sorted event storage with cursor-based consumption.
//!
//! Events are stored sorted by time. A cursor tracks how far playback has
//! read, so `drain_through` only scans unfired events and a loop can replay
//! the same events by rewinding the cursor.

use std::time::Duration;

use super::types::TimelineEvent;

/// A sorted timeline of events with a read cursor.
#[derive(Debug, Default)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
    cursor: usize,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single event after any already-stored events with the same time.
    pub fn insert(&mut self, event: TimelineEvent) {
        let pos = self.events[self.cursor..].partition_point(|e| e.time <= event.time) + self.cursor;
        self.events.insert(pos, event);
    }

    /// Drain every unfired event with `time <= to`, in time order.
    pub fn drain_through(&mut self, to: Duration) -> Vec<TimelineEvent> {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].time <= to {
            self.cursor += 1;
        }
        self.events[start..self.cursor].to_vec()
    }

    /// Peek at the next unfired event without advancing the cursor.
    pub fn peek_next(&self) -> Option<&TimelineEvent> {
        self.events.get(self.cursor)
    }

    /// Rewind the cursor so every event fires again.
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Total number of events in the timeline.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of unfired events remaining after the cursor.
    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.cursor)
    }

    /// Remove all events and reset the cursor.
    pub fn clear(&mut self) {
        self.events.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::beat::Beat;
    use crate::event::types::EventKind;

    fn highlight(beat: u32, line: usize) -> TimelineEvent {
        TimelineEvent::new(
            Beat::from_beats(beat),
            Duration::from_secs(1),
            EventKind::LineHighlight { line },
        )
    }

    fn insert_all<const N: usize>(tl: &mut Timeline, events: [TimelineEvent; N]) {
        for event in events {
            tl.insert(event);
        }
    }

    fn lines(events: &[TimelineEvent]) -> Vec<usize> {
        events
            .iter()
            .map(|e| match e.kind {
                EventKind::LineHighlight { line } => line,
                _ => usize::MAX,
            })
            .collect()
    }

    #[test]
    fn empty_timeline() {
        let mut tl = Timeline::new();
        assert_eq!(tl.len(), 0);
        assert!(tl.is_empty());
        assert_eq!(tl.remaining(), 0);
        assert!(tl.peek_next().is_none());
    }

    #[test]
    fn sorted_order_maintained() {
        let mut tl = Timeline::new();
        tl.insert(highlight(2, 2));
        tl.insert(highlight(0, 0));
        tl.insert(highlight(1, 1));

        let events = tl.drain_through(Duration::from_secs(10));
        assert_eq!(lines(&events), vec![0, 1, 2]);
    }

    #[test]
    fn simultaneous_events_keep_insertion_order() {
        let mut tl = Timeline::new();
        tl.insert(highlight(1, 10));
        tl.insert(highlight(1, 11));
        tl.insert(highlight(1, 12));
        tl.insert(highlight(0, 13));

        let events = tl.drain_through(Duration::from_secs(1));
        assert_eq!(lines(&events), vec![13, 10, 11, 12]);
    }

    #[test]
    fn drain_through_is_inclusive() {
        let mut tl = Timeline::new();
        insert_all(&mut tl, [highlight(0, 0), highlight(1, 1), highlight(2, 2)]);

        let events = tl.drain_through(Duration::from_secs(1));
        assert_eq!(lines(&events), vec![0, 1]);
        assert_eq!(tl.remaining(), 1);
    }

    #[test]
    fn drain_through_advances_cursor() {
        let mut tl = Timeline::new();
        insert_all(&mut tl, [highlight(0, 0), highlight(1, 1)]);

        assert_eq!(tl.drain_through(Duration::ZERO).len(), 1);
        assert!(tl.drain_through(Duration::ZERO).is_empty());
        assert_eq!(lines(&tl.drain_through(Duration::from_secs(5))), vec![1]);
    }

    #[test]
    fn reset_cursor_replays() {
        let mut tl = Timeline::new();
        insert_all(&mut tl, [highlight(0, 0), highlight(1, 1)]);

        tl.drain_through(Duration::from_secs(10));
        assert_eq!(tl.remaining(), 0);

        tl.reset_cursor();
        assert_eq!(tl.remaining(), 2);
    }

    #[test]
    fn peek_next_does_not_advance() {
        let mut tl = Timeline::new();
        tl.insert(highlight(0, 0));

        let first = tl.peek_next().map(|e| e.time);
        let second = tl.peek_next().map(|e| e.time);
        assert_eq!(first, second);
        assert_eq!(tl.remaining(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let mut tl = Timeline::new();
        insert_all(&mut tl, [highlight(0, 0), highlight(1, 1)]);
        tl.drain_through(Duration::ZERO);

        tl.clear();
        assert_eq!(tl.len(), 0);
        assert_eq!(tl.remaining(), 0);
        assert!(tl.peek_next().is_none());
    }
}
